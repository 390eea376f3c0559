//! Fixed-position page output built directly on `printpdf`.

use std::fmt;
use std::io::BufWriter;

use image::DynamicImage;
use log::debug;
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use super::{PageSetup, RenderedPdf, Renderer};
use crate::error::RenderError;
use crate::images::{self, DEFAULT_IMAGE_DPI};
use crate::model::PageRecord;

const DOCUMENT_TITLE: &str = "Presentation";
const LAYER_NAME: &str = "Content";
const PT_TO_MM: f64 = 25.4 / 72.0;

const CELL_HEIGHT_MM: f64 = 10.0;
const HEADER_BAND_MM: f64 = 18.0;
const HEADER_IMAGE_WIDTH_MM: f64 = 40.0;
const HEADLINE_HEIGHT_MM: f64 = 14.0;
const LINE_HEIGHT_MM: f64 = 8.0;
const FOOTER_HEIGHT_MM: f64 = 8.0;
const BLOCK_SPACING_MM: f64 = 4.0;
const MIN_IMAGE_HEIGHT_MM: f64 = 10.0;

/// Selects which parts of a page record are placed on the page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Layout {
    /// Only the body text is placed, in a single cell at the top-left margin.
    #[default]
    BodyOnly,
    /// Header image and text, headline, body text, screen image and footer text are all placed.
    Full,
}

/// Renders one fixed-layout page per record using the built-in Helvetica Bold font.
#[derive(Clone, Debug, Default)]
pub struct PageRenderer {
    setup: PageSetup,
    layout: Layout,
}

impl PageRenderer {
    /// Creates a renderer with the default page setup and [`Layout::BodyOnly`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn setup(&self) -> &PageSetup {
        &self.setup
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Sets the page setup and returns the updated renderer.
    pub fn with_setup(mut self, setup: PageSetup) -> Self {
        self.setup = setup;
        self
    }

    /// Sets the layout mode and returns the updated renderer.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }
}

impl Renderer for PageRenderer {
    fn render(&self, records: &[PageRecord]) -> Result<RenderedPdf, RenderError> {
        let document = PdfDocument::empty(DOCUMENT_TITLE);
        let font = document
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(engine_error)?;
        let (width, height) = self.setup.page_size_mm();

        for (index, record) in records.iter().enumerate() {
            let (page, layer) = document.add_page(Mm(width), Mm(height), LAYER_NAME);
            let canvas = Canvas {
                layer: document.get_page(page).get_layer(layer),
                font: &font,
                setup: &self.setup,
                width,
                height,
            };
            match self.layout {
                Layout::BodyOnly => canvas.body_cell(record.text()),
                Layout::Full => canvas.full_page(record),
            }
            debug!("Placed page {} of {}", index + 1, records.len());
        }

        let bytes = encode(document)?;
        Ok(RenderedPdf::one_page_per_record(bytes, records.len()))
    }
}

fn engine_error(err: impl fmt::Debug) -> RenderError {
    RenderError::Engine(format!("{err:?}"))
}

fn encode(document: PdfDocumentReference) -> Result<Vec<u8>, RenderError> {
    let mut writer = BufWriter::new(Vec::new());
    document.save(&mut writer).map_err(engine_error)?;
    writer
        .into_inner()
        .map_err(|err| RenderError::Engine(err.into_error().to_string()))
}

/// Drawing helpers for a single page; positions are measured from the top-left corner.
struct Canvas<'a> {
    layer: PdfLayerReference,
    font: &'a IndirectFontRef,
    setup: &'a PageSetup,
    width: f64,
    height: f64,
}

impl Canvas<'_> {
    /// Places `text` vertically centered in a cell whose top edge is `top` millimetres below the
    /// top of the page.
    fn cell(&self, text: &str, left: f64, top: f64, cell_height: f64, font_size: u8) {
        if text.is_empty() {
            return;
        }
        let baseline = top + cell_height / 2.0 + 0.3 * f64::from(font_size) * PT_TO_MM;
        self.layer.use_text(
            text,
            font_size.into(),
            Mm(left),
            Mm(self.height - baseline),
            self.font,
        );
    }

    fn body_cell(&self, text: &str) {
        let margin = self.setup.margin_mm();
        let single_line = text.lines().collect::<Vec<_>>().join(" ");
        self.cell(
            &single_line,
            margin,
            margin,
            CELL_HEIGHT_MM,
            self.setup.font_size(),
        );
    }

    fn full_page(&self, record: &PageRecord) {
        let margin = self.setup.margin_mm();
        let base_size = self.setup.font_size();
        let content_width = (self.width - 2.0 * margin).max(0.0);

        let mut header_text_left = margin;
        if let Some(logo) = images::decode_optional(record.header_image(), "header") {
            self.image(
                &logo,
                (margin, margin),
                (HEADER_IMAGE_WIDTH_MM, HEADER_BAND_MM),
                false,
            );
            header_text_left += HEADER_IMAGE_WIDTH_MM + BLOCK_SPACING_MM;
        }
        self.cell(
            record.header_text(),
            header_text_left,
            margin,
            HEADER_BAND_MM,
            base_size.saturating_sub(4).max(6),
        );

        let mut cursor = margin + HEADER_BAND_MM + BLOCK_SPACING_MM;
        if !record.headline().is_empty() {
            self.cell(
                record.headline(),
                margin,
                cursor,
                HEADLINE_HEIGHT_MM,
                base_size.saturating_add(8),
            );
            cursor += HEADLINE_HEIGHT_MM + BLOCK_SPACING_MM;
        }

        for line in record.text().lines() {
            self.cell(line, margin, cursor, LINE_HEIGHT_MM, base_size);
            cursor += LINE_HEIGHT_MM;
        }

        let footer_top = self.height - margin - FOOTER_HEIGHT_MM;
        if let Some(picture) = images::decode_optional(record.image(), "screen") {
            let top = cursor + BLOCK_SPACING_MM;
            let available = footer_top - BLOCK_SPACING_MM - top;
            if available >= MIN_IMAGE_HEIGHT_MM {
                self.image(&picture, (margin, top), (content_width, available), true);
            } else {
                debug!("No room left for the screen image; skipping it");
            }
        }

        self.cell(
            record.footer_text(),
            margin,
            footer_top,
            FOOTER_HEIGHT_MM,
            base_size.saturating_sub(6).max(6),
        );
    }

    /// Scales `image` into the box at `origin` (top-left) with the given `bounds`.
    fn image(&self, image: &DynamicImage, origin: (f64, f64), bounds: (f64, f64), centered: bool) {
        let natural = images::natural_size_mm(image, DEFAULT_IMAGE_DPI);
        let scale = images::fit_scale(natural, bounds);
        let placed = (natural.0 * scale, natural.1 * scale);
        let left = if centered {
            origin.0 + (bounds.0 - placed.0) / 2.0
        } else {
            origin.0
        };
        let bottom = self.height - (origin.1 + placed.1);

        printpdf::Image::from_dynamic_image(image).add_to_layer(
            self.layer.clone(),
            Some(Mm(left)),
            Some(Mm(bottom)),
            None,
            Some(scale),
            Some(scale),
            Some(DEFAULT_IMAGE_DPI),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::encode_test_png;
    use crate::model::{Footer, Header, Screen};
    use crate::render::Orientation;

    fn records(screens: &[Screen]) -> Vec<PageRecord> {
        let header = Header::default();
        let footer = Footer::default();
        screens
            .iter()
            .map(|screen| PageRecord::new(&header, &footer, screen))
            .collect()
    }

    fn labelled_record() -> PageRecord {
        let mut header = Header::default();
        header.set_text("HDRTEXT");
        let mut footer = Footer::default();
        footer.set_text("FTRTEXT");
        let screen = Screen::new().with_headline("HEADLN").with_text("BODYTXT");
        PageRecord::new(&header, &footer, &screen)
    }

    fn page_count(bytes: &[u8]) -> usize {
        lopdf::Document::load_mem(bytes)
            .expect("parse rendered pdf")
            .get_pages()
            .len()
    }

    /// Decompressed content stream of the first page.
    fn first_page_content(bytes: &[u8]) -> String {
        let document = lopdf::Document::load_mem(bytes).expect("parse rendered pdf");
        let page_id = *document.get_pages().get(&1).expect("first page");
        let content = document.get_page_content(page_id).expect("page content");
        String::from_utf8_lossy(&content).into_owned()
    }

    /// Text operand as printpdf writes it for a built-in font.
    fn hex_text(text: &str) -> String {
        let digits: String = text.bytes().map(|byte| format!("{byte:02X}")).collect();
        format!("<{digits}>")
    }

    #[test]
    fn emits_one_page_per_record() {
        let records = records(&[
            Screen::new().with_text("first"),
            Screen::new().with_text("second"),
            Screen::new().with_text("third"),
        ]);
        let rendered = PageRenderer::new().render(&records).expect("render");
        assert!(rendered.bytes.starts_with(b"%PDF"));
        assert_eq!(page_count(&rendered.bytes), 3);
        assert_eq!(rendered.page_count, 3);
        assert_eq!(rendered.screen_start_pages, vec![1, 2, 3]);
    }

    #[test]
    fn zero_records_yield_zero_pages() {
        let rendered = PageRenderer::new().render(&[]).expect("render");
        assert!(rendered.bytes.starts_with(b"%PDF"));
        assert_eq!(page_count(&rendered.bytes), 0);
        assert_eq!(rendered.page_count, 0);
        assert!(rendered.screen_start_pages.is_empty());
    }

    #[test]
    fn body_only_layout_draws_just_the_body() {
        let rendered = PageRenderer::new()
            .render(&[labelled_record()])
            .expect("render");
        let content = first_page_content(&rendered.bytes);

        assert!(content.contains(&hex_text("BODYTXT")), "{content}");
        for absent in ["HDRTEXT", "HEADLN", "FTRTEXT"] {
            assert!(!content.contains(&hex_text(absent)), "{absent} drawn: {content}");
        }
    }

    #[test]
    fn body_only_layout_joins_lines() {
        let record = records(&[Screen::new().with_text("AB\nCD")]).remove(0);
        let rendered = PageRenderer::new().render(&[record]).expect("render");
        let content = first_page_content(&rendered.bytes);
        assert!(content.contains(&hex_text("AB CD")), "{content}");
    }

    #[test]
    fn full_layout_draws_every_text_field() {
        let rendered = PageRenderer::new()
            .with_layout(Layout::Full)
            .render(&[labelled_record()])
            .expect("render");
        let content = first_page_content(&rendered.bytes);

        for present in ["HDRTEXT", "HEADLN", "BODYTXT", "FTRTEXT"] {
            assert!(content.contains(&hex_text(present)), "{present} missing: {content}");
        }
    }

    #[test]
    fn full_layout_tolerates_broken_images() {
        let screens = [
            Screen::new()
                .with_headline("Chart")
                .with_text("line one\nline two")
                .with_image(encode_test_png(40, 20)),
            Screen::new().with_headline("Broken").with_image("not base64 at all"),
        ];
        let rendered = PageRenderer::new()
            .with_layout(Layout::Full)
            .render(&records(&screens))
            .expect("render");
        assert_eq!(page_count(&rendered.bytes), 2);
    }

    #[test]
    fn portrait_setup_is_honoured() {
        let renderer = PageRenderer::new()
            .with_setup(PageSetup::new().with_orientation(Orientation::Portrait));
        let rendered = renderer
            .render(&records(&[Screen::new().with_text("tall")]))
            .expect("render");
        assert_eq!(page_count(&rendered.bytes), 1);
    }
}
