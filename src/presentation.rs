//! The top-level presentation builder.

use std::path::{Path, PathBuf};

use log::debug;

use crate::error::RenderError;
use crate::model::{Footer, Header, PageRecord, Screen};
use crate::render::{self, PageRenderer, RenderedPdf, Renderer};

/// Summary of a document written by [`Presentation::render`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Location of the written file.
    pub path: PathBuf,
    /// Number of pages in the written file.  Equals the screen count unless a screen overflowed.
    pub pages: usize,
    /// Size of the written file in bytes.
    pub bytes: usize,
}

/// Collects a shared header and footer plus an ordered sequence of screens and renders them as a
/// paginated PDF document.
///
/// ```no_run
/// use presenter::{Presentation, Screen};
///
/// let mut presentation = Presentation::new();
/// presentation.set_header_text("Q1 Report");
/// presentation.set_footer_text("Confidential");
/// presentation.add_screen(Screen::new().with_text("Revenue up 10%"));
/// presentation.set_output_path("q1.pdf");
/// presentation.render()?;
/// # Ok::<(), presenter::RenderError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Presentation {
    header: Header,
    footer: Footer,
    output_path: Option<PathBuf>,
    screens: Vec<Screen>,
}

impl Presentation {
    /// Creates an empty presentation without output path.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn footer(&self) -> &Footer {
        &self.footer
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    /// Returns the attached screens in render order.
    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    /// Returns the number of attached screens.
    pub fn len(&self) -> usize {
        self.screens.len()
    }

    /// Returns whether no screen has been attached yet.
    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Sets the text shown in the header of every page.
    pub fn set_header_text(&mut self, text: impl Into<String>) {
        self.header.set_text(text);
    }

    /// Sets the header image, expected to be a base64 encoded raster image.
    pub fn set_header_image(&mut self, image: impl Into<String>) {
        self.header.set_image(image);
    }

    /// Sets the text shown in the footer of every page.
    pub fn set_footer_text(&mut self, text: impl Into<String>) {
        self.footer.set_text(text);
    }

    /// Appends a screen; screens are rendered in the order they were added.
    pub fn add_screen(&mut self, screen: Screen) {
        self.screens.push(screen);
    }

    /// Sets the file the document is written to.  The path is only checked when rendering.
    pub fn set_output_path(&mut self, path: impl Into<PathBuf>) {
        self.output_path = Some(path.into());
    }

    /// Flattens the presentation into one record per screen, in screen order.
    pub fn page_records(&self) -> Vec<PageRecord> {
        self.screens
            .iter()
            .map(|screen| PageRecord::new(&self.header, &self.footer, screen))
            .collect()
    }

    /// Renders the presentation with the default [`PageRenderer`] and writes it to the output
    /// path.
    pub fn render(&self) -> Result<RenderedDocument, RenderError> {
        self.render_with(&PageRenderer::default())
    }

    /// Renders the presentation with `renderer` and writes it to the output path.
    pub fn render_with<R: Renderer + ?Sized>(
        &self,
        renderer: &R,
    ) -> Result<RenderedDocument, RenderError> {
        let path = self.require_output_path()?;
        let rendered = self.render_pages(renderer)?;
        persist(path, &rendered.bytes, rendered.page_count)
    }

    /// Renders the presentation with `renderer`, adds one bookmark per headline and writes the
    /// result to the output path.
    #[cfg(feature = "bookmarks")]
    pub fn render_with_bookmarks<R: Renderer + ?Sized>(
        &self,
        renderer: &R,
    ) -> Result<RenderedDocument, RenderError> {
        let path = self.require_output_path()?;
        let records = self.page_records();
        let rendered = renderer.render(&records)?;
        let bytes = crate::bookmarks::apply_headline_bookmarks(&rendered, &records)?;
        persist(path, &bytes, rendered.page_count)
    }

    /// Renders the presentation with `renderer` without touching the filesystem.
    pub fn render_to_bytes<R: Renderer + ?Sized>(
        &self,
        renderer: &R,
    ) -> Result<Vec<u8>, RenderError> {
        Ok(self.render_pages(renderer)?.bytes)
    }

    /// Renders the presentation with `renderer` and reports where each screen landed.
    pub fn render_pages<R: Renderer + ?Sized>(
        &self,
        renderer: &R,
    ) -> Result<RenderedPdf, RenderError> {
        let records = self.page_records();
        debug!("Rendering {} screens", records.len());
        renderer.render(&records)
    }

    fn require_output_path(&self) -> Result<&Path, RenderError> {
        self.output_path
            .as_deref()
            .ok_or(RenderError::MissingOutputPath)
    }
}

fn persist(path: &Path, bytes: &[u8], pages: usize) -> Result<RenderedDocument, RenderError> {
    render::write_document(path, bytes)?;
    Ok(RenderedDocument {
        path: path.to_path_buf(),
        pages,
        bytes: bytes.len(),
    })
}
