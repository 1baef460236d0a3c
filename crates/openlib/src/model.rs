//! Types decoded from the Open Library API.
//!
//! These types are pass-through data: nothing is validated beyond what JSON decoding requires,
//! and fields the types do not name are kept in `extra` so re-encoding a value gives back the
//! payload it was decoded from.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The envelope returned by `search.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Matching documents, in the order the API ranked them.
    pub docs: Vec<Doc>,
    /// Total number of matches.
    pub num_found: u64,
    /// Total number of matches, under the API's legacy name.
    #[serde(rename = "numFound")]
    pub num_found_legacy: u64,
    /// Whether `num_found` is exact.
    #[serde(rename = "numFoundExact")]
    pub num_found_exact: bool,
    /// Offset of the page.
    ///
    /// `None` when the key is missing, `Some(None)` when it is `null`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub offset: Option<Option<u64>>,
    /// The query as understood by the API.
    pub q: String,
    /// Index of the first document in `docs`.
    pub start: u64,
    /// Link to the API documentation.
    pub documentation_url: String,
    /// Fields of the envelope not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Marks a present key as `Some`, so `null` and a missing key stay distinct.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// One catalog entry from a search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Doc {
    /// Work key, e.g. `/works/OL1W`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Title of the work.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Keys of the authors, e.g. `OL1A`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_key: Option<Vec<String>>,
    /// Display names of the authors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<Vec<String>>,
    /// Edition used for the cover image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_edition_key: Option<String>,
    /// Cover image id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_i: Option<i64>,
    /// Year of the earliest known edition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i32>,
    /// Number of editions of the work.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition_count: Option<u32>,
    /// Whether any edition can be read online.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_fulltext: Option<bool>,
    /// Whether a public scan exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_scan_b: Option<bool>,
    /// e.g. `public`, `borrowable`, `no_ebook`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ebook_access: Option<String>,
    /// Internet Archive identifiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ia: Option<Vec<String>>,
    /// Internet Archive collections, `;` separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ia_collection_s: Option<String>,
    /// Edition available for lending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lending_edition_s: Option<String>,
    /// Internet Archive identifier used for lending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lending_identifier_s: Option<String>,
    /// MARC language codes, e.g. `eng`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Vec<String>>,
    /// Fields of the document not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Doc {
    /// The OLID of the work this document belongs to, taken from its `/works/<id>` key.
    ///
    /// ```
    /// use openlib::model::Doc;
    ///
    /// let doc = Doc { key: Some("/works/OL1W".to_owned()), ..Doc::default() };
    /// assert_eq!(Some("OL1W"), doc.work_id());
    /// ```
    #[must_use]
    pub fn work_id(&self) -> Option<&str> {
        self.key
            .as_deref()
            .and_then(|key| key.strip_prefix("/works/"))
            .filter(|id| !id.is_empty())
    }
}

/// A catalog work, as returned by `works/<id>.json`.
///
/// Only a handful of fields are typed, the rest stay in `extra`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Work {
    /// Title of the work.
    pub title: String,
    /// Work key, e.g. `/works/OL1W`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Free text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    /// Subject headings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<String>>,
    /// Authors of the work.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<AuthorRole>>,
    /// Fields of the work not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Work {
    /// Keys of the authors of the work, e.g. `/authors/OL1A`.
    pub fn author_keys(&self) -> impl Iterator<Item = &str> {
        self.authors
            .iter()
            .flatten()
            .map(|role| role.author.key.as_str())
    }
}

/// A work description, which the API sends either as a bare string or wrapped in a typed value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    /// A bare string.
    Text(String),
    /// An object such as `{"type": "/type/text", "value": "..."}`.
    Typed {
        /// The value type, usually `/type/text`.
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
        /// The description text.
        value: String,
    },
}

impl Description {
    /// The description text regardless of how it was sent.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Typed { value: text, .. } => text,
        }
    }
}

/// An entry of [`Work::authors`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthorRole {
    /// The author.
    pub author: Reference,
    /// Other fields such as the role type.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A reference to another catalog entity by key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Key of the referenced entity, e.g. `/authors/OL1A`.
    pub key: String,
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::{Description, Doc, SearchResult, Work};

    const SEARCH_JSON: &str = include_str!("../tests/data/search_result.json");
    const WORK_JSON: &str = include_str!("../tests/data/work.json");

    #[test]
    fn search_result_can_be_derived_from_json() {
        let res: SearchResult = serde_json::from_str(SEARCH_JSON).unwrap();

        assert_eq!(1, res.docs.len());
        assert_eq!(1, res.num_found);
        assert_eq!(1, res.num_found_legacy);
        assert!(res.num_found_exact);
        assert_eq!(Some(None), res.offset);
        assert_eq!("test query", res.q);

        let doc = &res.docs[0];
        assert_eq!(Some("Test Book"), doc.title.as_deref());
        assert_eq!(Some(vec!["OL1A".to_owned()]), doc.author_key);
        assert_eq!(Some(true), doc.has_fulltext);
        assert_eq!(Some("OL1W"), doc.work_id());
    }

    #[test]
    fn search_result_reencodes_to_same_payload() {
        let original: Value = serde_json::from_str(SEARCH_JSON).unwrap();
        let res: SearchResult = serde_json::from_value(original.clone()).unwrap();

        assert_eq!(original, serde_json::to_value(&res).unwrap());
    }

    #[test]
    fn offset_keeps_missing_and_null_apart() {
        let mut payload: Value = serde_json::from_str(SEARCH_JSON).unwrap();
        payload.as_object_mut().unwrap().remove("offset");

        let res: SearchResult = serde_json::from_value(payload.clone()).unwrap();
        assert_eq!(None, res.offset);
        assert_eq!(payload, serde_json::to_value(&res).unwrap());

        payload["offset"] = json!(20);
        let res: SearchResult = serde_json::from_value(payload.clone()).unwrap();
        assert_eq!(Some(Some(20)), res.offset);
        assert_eq!(payload, serde_json::to_value(&res).unwrap());
    }

    #[test]
    fn unknown_doc_fields_are_kept() {
        let doc: Doc = serde_json::from_value(json!({
            "key": "/works/OL2W",
            "subject": ["Fiction"],
            "ratings_average": 4.5
        }))
        .unwrap();

        assert_eq!(Some(&json!(["Fiction"])), doc.extra.get("subject"));
        assert_eq!(None, doc.title);
        assert_eq!(
            json!({"key": "/works/OL2W", "subject": ["Fiction"], "ratings_average": 4.5}),
            serde_json::to_value(&doc).unwrap()
        );
    }

    #[test]
    fn work_id_requires_works_prefix() {
        let doc = Doc {
            key: Some("/books/OL1M".to_owned()),
            ..Doc::default()
        };
        assert_eq!(None, doc.work_id());
        assert_eq!(None, Doc::default().work_id());
    }

    #[test]
    fn work_can_be_derived_from_json() {
        let work: Work = serde_json::from_str(WORK_JSON).unwrap();

        assert_eq!("Test Book", work.title);
        assert_eq!(
            Some("A book used in tests."),
            work.description.as_ref().map(Description::text)
        );
        assert_eq!(vec!["/authors/OL1A"], work.author_keys().collect::<Vec<_>>());
        assert_eq!(Some(&json!(3)), work.extra.get("revision"));
    }

    #[test]
    fn description_can_be_plain_or_typed() {
        let plain: Description = serde_json::from_value(json!("Plain")).unwrap();
        assert_eq!(Description::Text("Plain".to_owned()), plain);

        let typed: Description =
            serde_json::from_value(json!({"type": "/type/text", "value": "Typed"})).unwrap();
        assert_eq!("Typed", typed.text());

        let bare: Description = serde_json::from_value(json!({"value": "Bare"})).unwrap();
        assert_eq!(
            Description::Typed {
                kind: None,
                value: "Bare".to_owned()
            },
            bare
        );
    }

    #[test]
    fn work_without_optional_fields() {
        let work: Work = serde_json::from_value(json!({"title": "Only a title"})).unwrap();

        assert_eq!(None, work.description);
        assert_eq!(0, work.author_keys().count());
    }
}
