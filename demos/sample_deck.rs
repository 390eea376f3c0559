use std::error::Error;

use presenter::{Layout, PageRenderer};

fn main() -> Result<(), Box<dyn Error>> {
    let mut presentation = presenter::demo::sample_presentation()?;
    presentation.set_output_path("sample_deck.pdf");

    let document = presentation.render_with(&PageRenderer::new().with_layout(Layout::Full))?;
    println!(
        "Generated {} ({} pages, {} bytes)",
        document.path.display(),
        document.pages,
        document.bytes
    );
    Ok(())
}
