//! Headline outline for rendered presentations.
//!
//! Each screen with a headline becomes a top-level outline entry that opens the page on which the
//! screen starts.  The outline is spliced into already encoded bytes with `lopdf`, so it works the
//! same for every rendering engine.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::model::PageRecord;
use crate::render::RenderedPdf;

#[derive(Debug)]
pub enum BookmarkError {
    /// `lopdf` could not read the rendered bytes or write them back.
    Parse(lopdf::Error),
    /// The trailer has no `/Root` entry to hang the outline on.
    MissingCatalog,
    /// `/Root` resolves to something other than a dictionary.
    InvalidCatalog,
    /// The renderer reported start pages for a different number of screens.
    StartPagesMismatch { screens: usize, start_pages: usize },
    /// A screen claims to start on a page the document does not have.
    MissingPage { page_number: usize },
}

impl From<lopdf::Error> for BookmarkError {
    fn from(err: lopdf::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<std::io::Error> for BookmarkError {
    fn from(err: std::io::Error) -> Self {
        Self::Parse(err.into())
    }
}

impl std::fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "Could not read the rendered presentation: {err}"),
            Self::MissingCatalog => write!(f, "Rendered presentation has no document catalog"),
            Self::InvalidCatalog => write!(f, "Document catalog is not a dictionary"),
            Self::StartPagesMismatch {
                screens,
                start_pages,
            } => write!(
                f,
                "Renderer reported {start_pages} start pages for {screens} screens"
            ),
            Self::MissingPage { page_number } => {
                write!(f, "Headline points at page {page_number}, which was not rendered")
            }
        }
    }
}

impl std::error::Error for BookmarkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

/// Returns the rendered bytes with one outline entry per headlined screen.
///
/// Entries keep screen order and open the screen's first page with a `/Fit` view.  When no screen
/// has a headline the bytes are returned as rendered.
pub fn apply_headline_bookmarks(
    rendered: &RenderedPdf,
    records: &[PageRecord],
) -> Result<Vec<u8>, BookmarkError> {
    if records.len() != rendered.screen_start_pages.len() {
        return Err(BookmarkError::StartPagesMismatch {
            screens: records.len(),
            start_pages: rendered.screen_start_pages.len(),
        });
    }
    if records.iter().all(|record| record.headline().is_empty()) {
        return Ok(rendered.bytes.clone());
    }

    let mut document = Document::load_mem(&rendered.bytes)?;
    let pages = document.get_pages();
    let mut entries =
        collect_outline_entries(&mut document, records, &rendered.screen_start_pages, &pages)?;

    let outlines_id = document.new_object_id();
    link_outline_entries(outlines_id, &mut document, &mut entries);
    insert_outlines_root(outlines_id, &mut document, &entries)?;

    let mut buffer = Vec::new();
    document.save_to(&mut buffer)?;
    Ok(buffer)
}

struct OutlineEntry {
    object_id: ObjectId,
    page_ref: ObjectId,
    title: String,
}

fn collect_outline_entries(
    document: &mut Document,
    records: &[PageRecord],
    start_pages: &[usize],
    pages: &BTreeMap<u32, ObjectId>,
) -> Result<Vec<OutlineEntry>, BookmarkError> {
    let mut entries = Vec::new();

    for (record, &page_number) in records.iter().zip(start_pages) {
        if record.headline().is_empty() {
            continue;
        }
        let page_ref = pages
            .get(&(page_number as u32))
            .copied()
            .ok_or(BookmarkError::MissingPage { page_number })?;

        entries.push(OutlineEntry {
            object_id: document.new_object_id(),
            page_ref,
            title: record.headline().to_string(),
        });
    }

    Ok(entries)
}

fn link_outline_entries(
    outlines_id: ObjectId,
    document: &mut Document,
    entries: &mut [OutlineEntry],
) {
    for index in 0..entries.len() {
        let mut dictionary = Dictionary::new();
        dictionary.set(
            "Title",
            Object::string_literal(entries[index].title.as_str()),
        );
        dictionary.set(
            "Dest",
            Object::Array(vec![
                Object::Reference(entries[index].page_ref),
                Object::Name("Fit".into()),
            ]),
        );
        dictionary.set("Parent", Object::Reference(outlines_id));

        if index > 0 {
            dictionary.set("Prev", Object::Reference(entries[index - 1].object_id));
        }
        if index + 1 < entries.len() {
            dictionary.set("Next", Object::Reference(entries[index + 1].object_id));
        }

        document
            .objects
            .insert(entries[index].object_id, Object::Dictionary(dictionary));
    }
}

fn insert_outlines_root(
    outlines_id: ObjectId,
    document: &mut Document,
    entries: &[OutlineEntry],
) -> Result<(), BookmarkError> {
    let catalog_id = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| BookmarkError::MissingCatalog)?;

    let mut dictionary = Dictionary::new();
    dictionary.set("Type", Object::Name("Outlines".into()));
    dictionary.set("Count", Object::Integer(entries.len() as i64));
    if let Some(first) = entries.first() {
        dictionary.set("First", Object::Reference(first.object_id));
    }
    if let Some(last) = entries.last() {
        dictionary.set("Last", Object::Reference(last.object_id));
    }
    document
        .objects
        .insert(outlines_id, Object::Dictionary(dictionary));

    let catalog = document
        .objects
        .get_mut(&catalog_id)
        .ok_or(BookmarkError::MissingCatalog)?
        .as_dict_mut()
        .map_err(|_| BookmarkError::InvalidCatalog)?;
    catalog.set("Outlines", Object::Reference(outlines_id));
    catalog.set("PageMode", Object::Name("UseOutlines".into()));

    Ok(())
}
