//! Flowing page layout built on `genpdf`.
//!
//! The shared header and footer are drawn by a page decorator on every page while the content of
//! each screen flows through the remaining area.  Screens are separated by explicit page breaks;
//! a screen whose content does not fit continues on the following page.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use genpdf::elements::{Break, Image, LinearLayout, PageBreak, Paragraph};
use genpdf::error::{Error, ErrorKind};
use genpdf::style::Style;
use genpdf::{self, Alignment, Element, Margins, Mm, PageDecorator, Position, Scale, Size};
use image::DynamicImage;
use log::debug;

use super::{PageRenderer, PageSetup, RenderedPdf, Renderer};
use crate::error::RenderError;
use crate::fonts;
use crate::images::{self, DEFAULT_IMAGE_DPI};
use crate::model::PageRecord;

const DOCUMENT_TITLE: &str = "Presentation";
const HEADER_IMAGE_BOUNDS_MM: (f64, f64) = (40.0, 15.0);
const FOOTER_HEIGHT_MM: f64 = 10.0;
const SCREEN_IMAGE_MAX_HEIGHT_MM: f64 = 80.0;

fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

/// Renders each screen with `genpdf`, drawing the shared header and footer on every page.
///
/// Requires the Roboto font family, see [`crate::fonts`].
#[derive(Clone, Debug, Default)]
pub struct FlowRenderer {
    setup: PageSetup,
    font_dir: Option<PathBuf>,
}

impl FlowRenderer {
    /// Creates a renderer with the default page setup.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn setup(&self) -> &PageSetup {
        &self.setup
    }

    pub fn font_dir(&self) -> Option<&Path> {
        self.font_dir.as_deref()
    }

    /// Sets the page setup and returns the updated renderer.
    pub fn with_setup(mut self, setup: PageSetup) -> Self {
        self.setup = setup;
        self
    }

    /// Loads the Roboto files from `dir` instead of searching the default locations.
    pub fn with_font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.font_dir = Some(dir.into());
        self
    }

    fn build_document(
        &self,
        records: &[PageRecord],
        tracker: &PageTracker,
    ) -> Result<genpdf::Document, RenderError> {
        let font_family = match &self.font_dir {
            Some(dir) => fonts::font_family_from_dir(dir),
            None => fonts::default_font_family(),
        }
        .map_err(RenderError::FontLoad)?;
        let mut document = genpdf::Document::new(font_family);
        document.set_title(DOCUMENT_TITLE);
        document.set_font_size(self.setup.font_size());

        let (width, height) = self.setup.page_size_mm();
        document.set_paper_size(Size::new(mm_from_f64(width), mm_from_f64(height)));

        // Records share one header and footer, so the first record describes every page.
        let shared = &records[0];
        let decorator = SlideDecorator::new(
            Rc::clone(&tracker.pages),
            Margins::all(mm_from_f64(self.setup.margin_mm())),
            images::decode_optional(shared.header_image(), "header"),
            shared.header_text().to_string(),
            shared.footer_text().to_string(),
            self.setup.font_size(),
        );
        document.set_page_decorator(decorator);

        let content_width = width - 2.0 * self.setup.margin_mm();
        for (index, record) in records.iter().enumerate() {
            if index > 0 {
                document.push(PageBreak::new());
            }
            let screen = self.screen_element(record, content_width)?;
            document.push(tracker.mark(screen));
        }

        Ok(document)
    }

    fn screen_element(
        &self,
        record: &PageRecord,
        content_width: f64,
    ) -> Result<LinearLayout, RenderError> {
        let mut layout = LinearLayout::vertical();

        if !record.headline().is_empty() {
            let style = Style::new()
                .bold()
                .with_font_size(self.setup.font_size().saturating_add(8));
            layout.push(Paragraph::new(record.headline()).styled(style));
            layout.push(Break::new(1));
        }

        for line in record.text().lines() {
            if line.trim().is_empty() {
                layout.push(Break::new(1));
            } else {
                layout.push(Paragraph::new(line));
            }
        }

        if let Some(picture) = images::decode_optional(record.image(), "screen") {
            layout.push(Break::new(1));
            let bounds = (content_width, SCREEN_IMAGE_MAX_HEIGHT_MM);
            layout.push(scaled_image(picture, bounds, Alignment::Center)?);
        }

        Ok(layout)
    }
}

impl Renderer for FlowRenderer {
    fn render(&self, records: &[PageRecord]) -> Result<RenderedPdf, RenderError> {
        if records.is_empty() {
            debug!("No pages to lay out; emitting an empty document");
            return PageRenderer::new().with_setup(self.setup).render(records);
        }

        let tracker = PageTracker::default();
        let document = self.build_document(records, &tracker)?;
        let mut bytes = Vec::new();
        document.render(&mut bytes)?;

        let rendered = RenderedPdf {
            bytes,
            page_count: tracker.pages.get(),
            screen_start_pages: tracker.starts.take(),
        };
        debug!(
            "Laid out {} screens on {} pages",
            records.len(),
            rendered.page_count
        );
        Ok(rendered)
    }
}

/// Page bookkeeping shared between the decorator and the screen elements.
#[derive(Default)]
struct PageTracker {
    /// Number of pages started so far; the decorator runs once per page.
    pages: Rc<Cell<usize>>,
    starts: Rc<RefCell<Vec<usize>>>,
}

impl PageTracker {
    fn mark<E: Element>(&self, inner: E) -> ScreenStart<E> {
        ScreenStart {
            inner,
            pages: Rc::clone(&self.pages),
            starts: Rc::clone(&self.starts),
            recorded: false,
        }
    }
}

/// Records the page on which the wrapped screen is first drawn.
struct ScreenStart<E> {
    inner: E,
    pages: Rc<Cell<usize>>,
    starts: Rc<RefCell<Vec<usize>>>,
    recorded: bool,
}

impl<E: Element> Element for ScreenStart<E> {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: genpdf::render::Area<'_>,
        style: Style,
    ) -> Result<genpdf::RenderResult, Error> {
        if !self.recorded {
            self.recorded = true;
            self.starts.borrow_mut().push(self.pages.get());
        }
        self.inner.render(context, area, style)
    }
}

fn scaled_image(
    picture: DynamicImage,
    bounds: (f64, f64),
    alignment: Alignment,
) -> Result<Image, Error> {
    let natural = images::natural_size_mm(&picture, DEFAULT_IMAGE_DPI);
    let scale = images::fit_scale(natural, bounds);
    let mut image = Image::from_dynamic_image(picture)?;
    image.set_scale(Scale::new(scale, scale));
    image.set_alignment(alignment);
    Ok(image)
}

/// Draws the shared header band and footer line on every page.
struct SlideDecorator {
    page: Rc<Cell<usize>>,
    margins: Margins,
    logo: Option<DynamicImage>,
    header_text: String,
    footer_text: String,
    font_size: u8,
}

impl SlideDecorator {
    fn new(
        page: Rc<Cell<usize>>,
        margins: Margins,
        logo: Option<DynamicImage>,
        header_text: String,
        footer_text: String,
        font_size: u8,
    ) -> Self {
        Self {
            page,
            margins,
            logo,
            header_text,
            footer_text,
            font_size,
        }
    }

    fn header(&self) -> Result<Option<LinearLayout>, Error> {
        if self.logo.is_none() && self.header_text.is_empty() {
            return Ok(None);
        }

        let mut layout = LinearLayout::vertical();
        if let Some(logo) = &self.logo {
            layout.push(scaled_image(
                logo.clone(),
                HEADER_IMAGE_BOUNDS_MM,
                Alignment::Left,
            )?);
        }
        if !self.header_text.is_empty() {
            let style = Style::new().with_font_size(self.font_size.saturating_sub(4).max(6));
            layout.push(Paragraph::new(self.header_text.as_str()).styled(style));
        }
        layout.push(Break::new(1));
        Ok(Some(layout))
    }
}

impl PageDecorator for SlideDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        self.page.set(self.page.get() + 1);
        area.add_margins(self.margins);

        if let Some(mut header) = self.header()? {
            let result = header.render(context, area.clone(), style)?;
            area.add_offset(Position::new(0, result.size.height));
        }

        if !self.footer_text.is_empty() {
            let footer_height = mm_from_f64(FOOTER_HEIGHT_MM);
            let available = area.size().height;
            if footer_height > available {
                return Err(Error::new(
                    "Footer height exceeds available space",
                    ErrorKind::InvalidData,
                ));
            }

            let mut footer_area = area.clone();
            footer_area.add_offset(Position::new(0, available - footer_height));
            let footer_style = Style::new().with_font_size(self.font_size.saturating_sub(6).max(6));
            let mut footer = Paragraph::new(self.footer_text.as_str()).styled(footer_style);
            let result = footer.render(context, footer_area, style)?;
            if result.has_more {
                let page = self.page.get();
                return Err(Error::new(
                    format!("Footer does not fit into the reserved space on page {page}"),
                    ErrorKind::PageSizeExceeded,
                ));
            }

            area.set_height(available - footer_height);
        }

        Ok(area)
    }
}
