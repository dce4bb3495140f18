//! Import of documentation-generator search indices (`searchindex.js`).
//!
//! The generated file is a JavaScript call, `Search.setIndex({...})`, whose
//! argument is an object literal with unquoted keys and positional arrays:
//!
//! - `docnames`, `filenames`, `titles`: parallel arrays, one slot per document
//! - `terms`: token to a document number or an array of document numbers
//! - `titleterms`: the same, for words in document titles
//!
//! Import turns the positional arrays into named [`Document`] records and
//! the posting values into [`TermTable`]s. The generator stems its keys with
//! the original Porter algorithm, so imported indices are marked
//! [`StemmerAlgorithm::Porter`] and queries against them are stemmed the
//! same way.
//!
//! `objects`, `objnames`, `objtypes` and `envversion` carry API
//! cross-reference data and are ignored.

pub mod lexer;
pub mod parser;

pub use parser::{parse, IndexParser, JsValue};

use tracing::info;

use crate::config::StemmerAlgorithm;
use crate::error::DocsearchError;
use crate::index::{SearchIndex, TermTable};
use crate::models::{Document, Posting};
use crate::Result;

/// Parse `searchindex.js` text and convert it to a validated index
pub fn import_str(text: &str) -> Result<SearchIndex> {
    let root = parse(text)?;
    let index = import_value(&root)?;
    let stats = index.stats();
    info!(
        documents = stats.documents,
        terms = stats.terms,
        title_terms = stats.title_terms,
        "imported searchindex.js"
    );
    Ok(index)
}

/// Convert an already parsed index object
pub fn import_value(root: &JsValue) -> Result<SearchIndex> {
    if root.as_object().is_none() {
        return Err(import_error("index payload is not an object"));
    }

    let docnames = string_array(root, "docnames")?;
    let filenames = string_array(root, "filenames")?;
    let titles = string_array(root, "titles")?;
    if docnames.len() != filenames.len() || docnames.len() != titles.len() {
        return Err(import_error(format!(
            "docnames ({}), filenames ({}) and titles ({}) differ in length",
            docnames.len(),
            filenames.len(),
            titles.len()
        )));
    }

    let documents = titles
        .iter()
        .zip(filenames.iter())
        .enumerate()
        .map(|(id, (title, path))| Document::new(id as u32, *title, *path))
        .collect();

    let terms = match root.get("terms") {
        Some(value) => term_table(value, "terms")?,
        None => return Err(import_error("missing 'terms'")),
    };
    let title_terms = match root.get("titleterms") {
        Some(value) => term_table(value, "titleterms")?,
        None => TermTable::new(),
    };

    Ok(SearchIndex::from_parts(documents, terms, title_terms)?.with_stemmer(StemmerAlgorithm::Porter))
}

fn string_array<'a>(root: &'a JsValue, key: &str) -> Result<Vec<&'a str>> {
    let items = root
        .get(key)
        .and_then(JsValue::as_array)
        .ok_or_else(|| import_error(format!("missing or non-array '{}'", key)))?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .ok_or_else(|| import_error(format!("non-string entry in '{}'", key)))
        })
        .collect()
}

/// Keys are lowercased; keys that collide after lowercasing share one list
fn term_table(value: &JsValue, field: &str) -> Result<TermTable> {
    let entries = value
        .as_object()
        .ok_or_else(|| import_error(format!("'{}' is not an object", field)))?;

    let mut table = TermTable::new();
    for (key, postings) in entries {
        let token = key.to_lowercase();
        let docs = match postings {
            JsValue::Array(items) => items.iter().collect::<Vec<_>>(),
            single => vec![single],
        };
        for doc in docs {
            let id = doc.as_index().ok_or_else(|| {
                import_error(format!(
                    "invalid document number {:?} for '{}' in '{}'",
                    doc, key, field
                ))
            })?;
            table.add_posting(&token, Posting::new(id));
        }
    }
    Ok(table)
}

fn import_error(message: impl Into<String>) -> DocsearchError {
    DocsearchError::SphinxImport(message.into())
}
