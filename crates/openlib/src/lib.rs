#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]

//! # openlib
//!
//! openlib is a small blocking client for the [Open Library](https://openlibrary.org) search
//! and works APIs. It builds search requests from query parameters, decodes the JSON responses
//! into [`model`] types and validates ISBNs before looking books up by them.
//!
//! The free functions use a default [`OpenLibrary`], build one with
//! [`OpenLibrary::with_base_url`] or [`OpenLibrary::with_client`] to talk to another host.

mod api;
mod error;
pub mod isbn;
pub mod model;

pub use api::{
    open_library::{OpenLibrary, DEFAULT_BASE_URL},
    Client, Response,
};
pub use error::{Error, ErrorKind};

use log::trace;
use model::{Doc, SearchResult, Work};

/// Searches the catalog using the default client.
///
/// # Errors
///
/// See [`OpenLibrary::search`].
#[inline]
pub fn search<I, K, V>(params: I) -> Result<SearchResult, Error>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    trace!("Search using the default client");
    OpenLibrary::new().search(params)
}

/// Finds a book by its 10 or 13-digit ISBN using the default client.
///
/// # Errors
///
/// See [`OpenLibrary::find_book_by_isbn`].
#[inline]
pub fn find_book_by_isbn(isbn: &str) -> Result<Option<Doc>, Error> {
    trace!("Search book by ISBN of '{isbn}'");
    OpenLibrary::new().find_book_by_isbn(isbn)
}

/// Fetches a work by its Open Library id using the default client.
///
/// # Errors
///
/// See [`OpenLibrary::get_work_by_olid`].
#[inline]
pub fn get_work_by_olid(olid: &str) -> Result<Work, Error> {
    trace!("Fetch work by OLID of '{olid}'");
    OpenLibrary::new().get_work_by_olid(olid)
}
