use log::{info, trace};
use url::form_urlencoded;

use crate::{
    isbn::{Isbn, Validation},
    model::{Doc, SearchResult, Work},
    Error, ErrorKind,
};

use super::{decode, Client, Response};

/// Host used when no other base URL is given.
pub const DEFAULT_BASE_URL: &str = "https://openlibrary.org";

/// A client for the Open Library search and works APIs.
///
/// Each call sends exactly one request and nothing is cached between calls, so a single
/// `OpenLibrary` can be shared freely.
#[derive(Clone, Debug)]
pub struct OpenLibrary<C = reqwest::blocking::Client> {
    client: C,
    base_url: String,
}

impl OpenLibrary {
    /// Creates a client for [`DEFAULT_BASE_URL`] using a blocking [`reqwest`] client.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client for another host, e.g. a local stub server.
    #[must_use]
    pub fn with_base_url<S: Into<String>>(base_url: S) -> Self {
        Self::with_client(reqwest::blocking::Client::new(), base_url)
    }
}

impl Default for OpenLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Client> OpenLibrary<C> {
    /// Creates an `OpenLibrary` which sends its requests through `client`.
    ///
    /// A trailing `/` on `base_url` is ignored.
    #[must_use]
    pub fn with_client<S: Into<String>>(client: C, base_url: S) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    /// The host requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Searches the catalog.
    ///
    /// `params` are sent form-encoded in the order given, see the
    /// [API documentation](https://openlibrary.org/dev/docs/api/search) for the supported
    /// parameters.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Io`] error is returned when the request fails to send.
    /// An [`ErrorKind::Status`] error is returned for a non-success response.
    /// An [`ErrorKind::Deserialize`] error is returned when the body is not a search result.
    pub fn search<I, K, V>(&self, params: I) -> Result<SearchResult, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let url = self.search_url(params);
        let resp = self.fetch(&url)?;

        if !resp.is_success() {
            return Err(status_error("Failed to fetch", &resp));
        }

        let result: SearchResult = decode(&resp)?;
        trace!("Search found {} documents", result.num_found);
        Ok(result)
    }

    /// Finds a book by its 10 or 13-digit ISBN.
    ///
    /// The ISBN is validated with surrounding whitespace ignored but is sent to the API exactly
    /// as given. `Ok(None)` is returned when the search has no results.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::InvalidIsbn`] error is returned, without sending a request, when `isbn`
    /// is not a valid ISBN.
    /// Otherwise errors are the same as for [`OpenLibrary::search`].
    pub fn find_book_by_isbn(&self, isbn: &str) -> Result<Option<Doc>, Error> {
        let isbn: Isbn = isbn.parse().map_err(|validation: Validation| {
            Error::with_source(
                ErrorKind::InvalidIsbn,
                format!("Failed to parse ISBN: {validation}"),
                validation,
            )
        })?;

        self.find_book(&isbn)
    }

    /// Finds a book by an already validated [`Isbn`].
    ///
    /// # Errors
    ///
    /// Errors are the same as for [`OpenLibrary::search`].
    pub fn find_book(&self, isbn: &Isbn) -> Result<Option<Doc>, Error> {
        info!("Searching for ISBN '{isbn}' using Open Library");
        let SearchResult { docs, .. } = self.search([("isbn", isbn.as_str())])?;

        let doc = docs.into_iter().next();
        if doc.is_none() {
            info!("No books found for ISBN '{isbn}'");
        }
        Ok(doc)
    }

    /// Fetches a work by its Open Library id, e.g. `OL45804W`.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Io`] error is returned when the request fails to send.
    /// An [`ErrorKind::Status`] error is returned for a non-success response.
    /// An [`ErrorKind::Deserialize`] error is returned when the body is not a work.
    pub fn get_work_by_olid(&self, olid: &str) -> Result<Work, Error> {
        info!("Fetching work '{olid}' from Open Library");
        let url = format!("{}/works/{olid}.json", self.base_url);
        let resp = self.fetch(&url)?;

        if !resp.is_success() {
            return Err(status_error(&format!("Failed to fetch work {olid}"), &resp));
        }

        decode(&resp)
    }

    fn search_url<I, K, V>(&self, params: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish();
        format!("{}/search.json?{query}", self.base_url)
    }

    fn fetch(&self, url: &str) -> Result<Response, Error> {
        trace!("GET {url}");
        self.client.fetch(url)
    }
}

fn status_error(prefix: &str, resp: &Response) -> Error {
    Error::status_code(
        resp.status,
        format!("{prefix}: {} {}", resp.status, resp.status_text),
    )
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::{OpenLibrary, DEFAULT_BASE_URL};
    use crate::{
        api::{
            assert_url, impl_response_producer, ok_json, request_count, status, MockClient,
            NetworkErrorProducer, Producer,
        },
        isbn::{Isbn, Validation, Violation},
        model::SearchResult,
        ErrorKind,
    };

    const SEARCH_JSON: &str = include_str!("../../tests/data/search_result.json");
    const TWO_DOCS_JSON: &str = include_str!("../../tests/data/search_result_two_docs.json");
    const EMPTY_JSON: &str = include_str!("../../tests/data/search_result_empty.json");
    const WORK_JSON: &str = include_str!("../../tests/data/work.json");

    impl_response_producer! {
        SearchProducer => ok_json(SEARCH_JSON),
        TwoDocsProducer => ok_json(TWO_DOCS_JSON),
        EmptyDocsProducer => ok_json(EMPTY_JSON),
        WorkProducer => ok_json(WORK_JSON),
        NotFoundProducer => status(404, "Not Found"),
        ServerErrorProducer => status(500, "Internal Server Error"),
        InvalidJsonProducer => ok_json("<html>Not JSON</html>"),
    }

    fn library<P: Producer<crate::api::Response>>() -> OpenLibrary<MockClient<P>> {
        OpenLibrary::with_client(MockClient::<P>::default(), DEFAULT_BASE_URL)
    }

    #[test]
    fn search_url_keeps_param_order() {
        let res = library::<SearchProducer>()
            .search([("title", "test book"), ("author", "test author")])
            .expect("SearchProducer always produces a valid search result");

        assert_eq!(1, request_count());
        assert_url!("https://openlibrary.org/search.json?title=test+book&author=test+author");

        let expected: SearchResult = serde_json::from_str(SEARCH_JSON).unwrap();
        assert_eq!(expected, res);
    }

    #[test]
    fn search_with_single_param() {
        library::<SearchProducer>()
            .search([("q", "javascript")])
            .unwrap();
        assert_url!("https://openlibrary.org/search.json?q=javascript");
    }

    #[test]
    fn search_with_no_params_keeps_separator() {
        library::<SearchProducer>()
            .search(Vec::<(String, String)>::new())
            .unwrap();
        assert_url!("https://openlibrary.org/search.json?");
    }

    #[test]
    fn search_params_are_form_encoded() {
        library::<SearchProducer>()
            .search([("title", "C++ Programming & Design")])
            .unwrap();
        assert_url!("https://openlibrary.org/search.json?title=C%2B%2B+Programming+%26+Design");
    }

    #[test]
    fn search_accepts_owned_params() {
        let params = vec![
            ("author".to_owned(), "tolkien".to_owned()),
            ("sort".to_owned(), "new".to_owned()),
        ];
        library::<SearchProducer>().search(params).unwrap();
        assert_url!("https://openlibrary.org/search.json?author=tolkien&sort=new");
    }

    #[test]
    fn search_not_found_status() {
        let err = library::<NotFoundProducer>()
            .search([("title", "test")])
            .unwrap_err();

        assert_eq!(ErrorKind::Status, err.kind());
        assert_eq!(Some(404), err.status());
        assert_eq!("Failed to fetch: 404 Not Found", err.to_string());
    }

    #[test]
    fn search_server_error_status() {
        let err = library::<ServerErrorProducer>()
            .search([("title", "test")])
            .unwrap_err();

        assert_eq!("Failed to fetch: 500 Internal Server Error", err.to_string());
    }

    #[test]
    fn search_network_error_is_unchanged() {
        let err = library::<NetworkErrorProducer>()
            .search([("title", "test")])
            .unwrap_err();

        assert_eq!(ErrorKind::Io, err.kind());
        assert_eq!("Network error", err.to_string());
    }

    #[test]
    fn search_invalid_json_is_deserialize_error() {
        let err = library::<InvalidJsonProducer>()
            .search([("title", "test")])
            .unwrap_err();

        assert_eq!(ErrorKind::Deserialize, err.kind());
    }

    #[test]
    fn body_missing_fields_is_deserialize_error() {
        let client: MockClient = MockClient::default();
        let err = OpenLibrary::with_client(client, DEFAULT_BASE_URL)
            .search([("title", "test")])
            .unwrap_err();

        assert_eq!(ErrorKind::Deserialize, err.kind());
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let lib = OpenLibrary::with_client(
            MockClient::<SearchProducer>::default(),
            "http://localhost:8080/",
        );
        assert_eq!("http://localhost:8080", lib.base_url());

        lib.search([("q", "rust")]).unwrap();
        assert_url!("http://localhost:8080/search.json?q=rust");
    }

    #[test]
    fn isbn_10_finds_book() {
        let doc = library::<SearchProducer>()
            .find_book_by_isbn("0123456789")
            .unwrap()
            .expect("SearchProducer always has a single doc");

        assert_url!("https://openlibrary.org/search.json?isbn=0123456789");
        assert_eq!(Some("Test Book"), doc.title.as_deref());
    }

    #[test]
    fn isbn_13_finds_book() {
        let doc = library::<SearchProducer>()
            .find_book_by_isbn("9781234567890")
            .unwrap();

        assert_url!("https://openlibrary.org/search.json?isbn=9781234567890");
        assert!(doc.is_some());
    }

    #[test]
    fn invalid_isbn_sends_no_request() {
        let err = library::<SearchProducer>()
            .find_book_by_isbn("invalid-isbn")
            .unwrap_err();

        assert_eq!(0, request_count());
        assert_eq!(ErrorKind::InvalidIsbn, err.kind());
        assert_eq!(
            "Failed to parse ISBN: Must be 10 or 13-digit, Must consist of only numbers",
            err.to_string()
        );

        let validation = err
            .source()
            .and_then(|e| e.downcast_ref::<Validation>())
            .expect("InvalidIsbn errors carry the validation");
        assert_eq!(
            &[Violation::Length, Violation::NonNumeric],
            validation.violations()
        );
    }

    #[test]
    fn wrong_length_isbn_reports_only_length() {
        let err = library::<SearchProducer>()
            .find_book_by_isbn("123456789")
            .unwrap_err();

        assert_eq!(0, request_count());
        assert_eq!("Failed to parse ISBN: Must be 10 or 13-digit", err.to_string());
    }

    #[test]
    fn non_numeric_isbn_reports_only_numeric() {
        let err = library::<SearchProducer>()
            .find_book_by_isbn("012345678X")
            .unwrap_err();

        assert_eq!(0, request_count());
        assert_eq!(
            "Failed to parse ISBN: Must consist of only numbers",
            err.to_string()
        );
    }

    #[test]
    fn first_of_many_docs_is_returned() {
        let doc = library::<TwoDocsProducer>()
            .find_book_by_isbn("0123456789")
            .unwrap()
            .unwrap();

        assert_eq!(Some("Test Book"), doc.title.as_deref());
        assert_eq!(Some("OL1W"), doc.work_id());
    }

    #[test]
    fn no_docs_returns_none() {
        let doc = library::<EmptyDocsProducer>()
            .find_book_by_isbn("0123456789")
            .unwrap();

        assert_eq!(None, doc);
    }

    #[test]
    fn search_status_error_passes_through_isbn_lookup() {
        let err = library::<ServerErrorProducer>()
            .find_book_by_isbn("0123456789")
            .unwrap_err();

        assert_eq!(ErrorKind::Status, err.kind());
        assert_eq!("Failed to fetch: 500 Internal Server Error", err.to_string());
    }

    #[test]
    fn untrimmed_isbn_is_sent() {
        library::<SearchProducer>()
            .find_book_by_isbn("  0123456789  ")
            .unwrap();

        assert_url!("https://openlibrary.org/search.json?isbn=++0123456789++");
    }

    #[test]
    fn find_book_with_parsed_isbn() {
        let isbn: Isbn = "9781234567890".parse().unwrap();
        let doc = library::<SearchProducer>().find_book(&isbn).unwrap();

        assert_eq!(1, request_count());
        assert!(doc.is_some());
    }

    #[test]
    fn work_url_format_is_correct() {
        let work = library::<WorkProducer>()
            .get_work_by_olid("OL45804W")
            .unwrap();

        assert_url!("https://openlibrary.org/works/OL45804W.json");
        assert_eq!("Test Book", work.title);
    }

    #[test]
    fn work_status_error_names_the_work() {
        let err = library::<NotFoundProducer>()
            .get_work_by_olid("OL0W")
            .unwrap_err();

        assert_eq!(ErrorKind::Status, err.kind());
        assert_eq!("Failed to fetch work OL0W: 404 Not Found", err.to_string());
    }

    #[test]
    fn work_network_error_is_unchanged() {
        let err = library::<NetworkErrorProducer>()
            .get_work_by_olid("OL1W")
            .unwrap_err();

        assert_eq!(ErrorKind::Io, err.kind());
        assert_eq!("Network error", err.to_string());
    }
}
