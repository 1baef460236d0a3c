use crate::app;

use openlib::{Client, OpenLibrary};

use clap::Subcommand;
use log::trace;

#[derive(Subcommand)]
#[non_exhaustive]
pub enum Commands {
    /// Search the catalog
    ///
    /// Parameters are passed to the search API as given, in order. See
    /// https://openlibrary.org/dev/docs/api/search for the supported parameters.
    #[clap(arg_required_else_help = true)]
    Search {
        /// Query parameters as KEY=VALUE pairs, e.g. `title="the hobbit" limit=5`
        #[clap(required = true, parse(try_from_str = parse_param))]
        params: Vec<(String, String)>,
    },
    /// Find a book by ISBN
    #[clap(arg_required_else_help = true)]
    Isbn {
        /// The 10 or 13-digit ISBN to search for
        isbn: String,
    },
    /// Fetch a work by its Open Library id
    #[clap(arg_required_else_help = true)]
    Work {
        /// The id of the work, e.g. OL45804W
        olid: String,
    },
}

impl Commands {
    pub fn execute<C: Client>(self, lib: &OpenLibrary<C>, json: bool) -> eyre::Result<String> {
        match self {
            Commands::Search { params } => {
                trace!("search subcommand called with {} parameters", params.len());
                let result = lib.search(params)?;
                if json {
                    app::to_json(&result)
                } else {
                    Ok(app::search_summary(&result))
                }
            }
            Commands::Isbn { isbn } => match lib.find_book_by_isbn(&isbn)? {
                doc if json => app::to_json(&doc),
                Some(doc) => Ok(app::doc_summary(&doc)),
                None => Ok(format!("No book found with the ISBN of '{isbn}'")),
            },
            Commands::Work { olid } => {
                let work = lib.get_work_by_olid(&olid)?;
                if json {
                    app::to_json(&work)
                } else {
                    Ok(app::work_summary(&work))
                }
            }
        }
    }
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .ok_or_else(|| format!("invalid KEY=VALUE pair '{s}'"))
}

#[test]
fn param_splits_on_first_equals() {
    assert_eq!(
        Ok(("q".to_owned(), "a=b".to_owned())),
        parse_param("q=a=b")
    );
    assert_eq!(
        Ok(("title".to_owned(), String::new())),
        parse_param("title=")
    );
    assert!(parse_param("title").is_err());
    assert!(parse_param("=value").is_err());
}
