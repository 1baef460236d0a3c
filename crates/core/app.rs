use std::fmt::Write;

use eyre::{eyre, WrapErr};
use openlib::model::{Description, Doc, SearchResult, Work};
use serde::Serialize;

pub fn to_json<T: Serialize>(value: &T) -> eyre::Result<String> {
    serde_json::to_string_pretty(value).wrap_err_with(|| eyre!("Cannot write result as JSON"))
}

pub fn search_summary(result: &SearchResult) -> String {
    let mut out = format!(
        "Found {} documents, showing {}",
        result.num_found,
        result.docs.len()
    );

    for doc in &result.docs {
        out.push('\n');
        out.push_str(&doc_line(doc));
    }
    out
}

fn doc_line(doc: &Doc) -> String {
    let mut line = format!("- {}", doc.title.as_deref().unwrap_or("No title"));

    if let Some(authors) = doc.author_name.as_ref().filter(|a| !a.is_empty()) {
        let _ = write!(line, " by {}", authors.join(", "));
    }
    if let Some(year) = doc.first_publish_year {
        let _ = write!(line, " ({year})");
    }
    if let Some(id) = doc.work_id() {
        let _ = write!(line, " [{id}]");
    }
    line
}

pub fn doc_summary(doc: &Doc) -> String {
    let mut out = format!("Title: {}", doc.title.as_deref().unwrap_or("No title"));

    if let Some(authors) = &doc.author_name {
        let _ = write!(out, "\nAuthors: {}", authors.join(", "));
    }
    if let Some(year) = doc.first_publish_year {
        let _ = write!(out, "\nFirst published: {year}");
    }
    if let Some(count) = doc.edition_count {
        let _ = write!(out, "\nEditions: {count}");
    }
    if let Some(id) = doc.work_id() {
        let _ = write!(out, "\nWork: {id}");
    }
    out
}

pub fn work_summary(work: &Work) -> String {
    let mut out = format!("Title: {}", work.title);

    let authors = work.author_keys().collect::<Vec<_>>();
    if !authors.is_empty() {
        let _ = write!(out, "\nAuthors: {}", authors.join(", "));
    }
    if let Some(subjects) = work.subjects.as_ref().filter(|s| !s.is_empty()) {
        let _ = write!(out, "\nSubjects: {}", subjects.join(", "));
    }
    if let Some(description) = work.description.as_ref().map(Description::text) {
        let _ = write!(out, "\n\n{description}");
    }
    out
}

#[test]
fn doc_summary_skips_missing_fields() {
    let doc = Doc {
        title: Some("Test Book".to_owned()),
        first_publish_year: Some(2020),
        ..Doc::default()
    };

    assert_eq!(
        "Title: Test Book\nFirst published: 2020",
        doc_summary(&doc)
    );
}

#[test]
fn search_summary_lists_each_doc() {
    let result: SearchResult = serde_json::from_str(
        r#"{
            "docs": [
                {"key": "/works/OL1W", "title": "Test Book", "author_name": ["Test Author"], "first_publish_year": 2020},
                {"title": "Second Book"}
            ],
            "documentation_url": "https://openlibrary.org/dev/docs/api/search",
            "num_found": 12,
            "numFound": 12,
            "numFoundExact": true,
            "offset": null,
            "q": "",
            "start": 0
        }"#,
    )
    .unwrap();

    assert_eq!(
        "Found 12 documents, showing 2\n- Test Book by Test Author (2020) [OL1W]\n- Second Book",
        search_summary(&result)
    );
}

#[test]
fn work_summary_uses_description_text() {
    let work: Work = serde_json::from_str(
        r#"{
            "title": "Test Book",
            "description": {"type": "/type/text", "value": "About the book."},
            "authors": [{"author": {"key": "/authors/OL1A"}}]
        }"#,
    )
    .unwrap();

    assert_eq!(
        "Title: Test Book\nAuthors: /authors/OL1A\n\nAbout the book.",
        work_summary(&work)
    );
}
