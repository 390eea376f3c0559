//! A small sample deck used by the command line runner and the `sample_deck` demo.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{DynamicImage, ImageBuffer, ImageOutputFormat, Rgb};

use crate::model::Screen;
use crate::presentation::Presentation;

/// Builds a three-screen quarterly review with a generated logo and chart.
pub fn sample_presentation() -> Result<Presentation, image::ImageError> {
    let mut presentation = Presentation::new();
    presentation.set_header_text("Q1 Report");
    presentation.set_header_image(gradient_png(160, 60, [36, 92, 160], [120, 180, 230])?);
    presentation.set_footer_text("Confidential");

    presentation.add_screen(
        Screen::new()
            .with_headline("Highlights")
            .with_text("Revenue up 10%\nCosts down 5%"),
    );
    presentation.add_screen(
        Screen::new()
            .with_headline("Trend")
            .with_text("Rolling eight-week throughput")
            .with_image(gradient_png(240, 140, [60, 92, 180], [200, 220, 255])?),
    );
    presentation.add_screen(Screen::new().with_headline("Questions"));

    Ok(presentation)
}

/// Renders a diagonal gradient between two colours and returns it as base64 encoded PNG.
fn gradient_png(
    width: u32,
    height: u32,
    start: [u8; 3],
    end: [u8; 3],
) -> Result<String, image::ImageError> {
    let width_f = width.saturating_sub(1).max(1) as f32;
    let height_f = height.saturating_sub(1).max(1) as f32;
    let buffer = ImageBuffer::from_fn(width, height, |x, y| {
        let mix = (0.65 * x as f32 / width_f + 0.35 * y as f32 / height_f).clamp(0.0, 1.0);
        let mut channels = [0u8; 3];
        for (index, channel) in channels.iter_mut().enumerate() {
            let start = start[index] as f32;
            let end = end[index] as f32;
            *channel = (start + (end - start) * mix).round().clamp(0.0, 255.0) as u8;
        }
        Rgb(channels)
    });

    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(buffer).write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
    Ok(STANDARD.encode(bytes))
}
