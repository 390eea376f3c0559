//! Rendering engines that turn page records into PDF documents.
//!
//! A [`Renderer`] only produces bytes.  Writing them to disk is a separate step performed by
//! [`write_document`], so the output file is opened and closed within a single call regardless of
//! which engine produced the document.

use std::fs;
use std::path::Path;

use log::info;

use crate::error::RenderError;
use crate::model::PageRecord;

mod flow;
mod page;

pub use flow::FlowRenderer;
pub use page::{Layout, PageRenderer};

/// Width of an A4 sheet in portrait orientation, in millimetres.
pub const A4_WIDTH_MM: f64 = 210.0;
/// Height of an A4 sheet in portrait orientation, in millimetres.
pub const A4_HEIGHT_MM: f64 = 297.0;

/// Encoded document returned by a [`Renderer`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedPdf {
    /// The encoded PDF document.
    pub bytes: Vec<u8>,
    /// Number of pages in `bytes`.
    pub page_count: usize,
    /// 1-indexed page on which each record starts, in record order.
    pub screen_start_pages: Vec<usize>,
}

impl RenderedPdf {
    /// Describes a document that holds exactly one page per record.
    pub fn one_page_per_record(bytes: Vec<u8>, records: usize) -> Self {
        Self {
            bytes,
            page_count: records,
            screen_start_pages: (1..=records).collect(),
        }
    }

    /// Returns the page on which record `index` (0-indexed) starts.
    pub fn start_page(&self, index: usize) -> Option<usize> {
        self.screen_start_pages.get(index).copied()
    }
}

/// Turns a sequence of page records into a PDF document.
///
/// Every record starts on a fresh page.  An engine may spill a record onto further pages, so
/// callers that need page numbers must use [`RenderedPdf::screen_start_pages`] rather than the
/// record index.
pub trait Renderer {
    /// Renders `records` in order and returns the encoded document.
    fn render(&self, records: &[PageRecord]) -> Result<RenderedPdf, RenderError>;
}

/// Page orientation of the generated document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Taller than wide.
    Portrait,
    /// Wider than tall.
    #[default]
    Landscape,
}

/// Page geometry and base typography shared by all engines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSetup {
    orientation: Orientation,
    font_size: u8,
    margin_mm: f64,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            orientation: Orientation::Landscape,
            font_size: 16,
            margin_mm: 10.0,
        }
    }
}

impl PageSetup {
    /// Creates the default setup: A4 landscape, 16 pt text and 10 mm margins.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn font_size(&self) -> u8 {
        self.font_size
    }

    pub fn margin_mm(&self) -> f64 {
        self.margin_mm
    }

    /// Sets the orientation and returns the updated setup.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets the base font size in points and returns the updated setup.
    pub fn with_font_size(mut self, font_size: u8) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the page margin in millimetres and returns the updated setup.
    pub fn with_margin_mm(mut self, margin_mm: f64) -> Self {
        self.margin_mm = margin_mm.max(0.0);
        self
    }

    /// Returns the page size as `(width, height)` in millimetres.
    pub fn page_size_mm(&self) -> (f64, f64) {
        match self.orientation {
            Orientation::Portrait => (A4_WIDTH_MM, A4_HEIGHT_MM),
            Orientation::Landscape => (A4_HEIGHT_MM, A4_WIDTH_MM),
        }
    }
}

/// Writes `bytes` to `path`, creating or truncating the file.
pub fn write_document(path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    fs::write(path, bytes).map_err(|err| RenderError::io(path, err))?;
    info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
