use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use presenter::{FlowRenderer, Layout, PageRenderer, Presentation, Renderer};

/// Renders presenter sample decks from the command line.
///
/// The `flow` engine needs the Roboto fonts under `assets/fonts` of the `presenter` crate or in
/// the directory named by `PRESENTER_FONTS_DIR`.
#[derive(Parser)]
#[command(author, version, about = "Convenience CLI for presenter decks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the sample quarterly deck.
    #[command(name = "sample")]
    Sample {
        /// File the PDF is written to.
        #[arg(short, long, default_value = "presentation.pdf")]
        output: PathBuf,

        /// Rendering engine.
        #[arg(long, value_enum, default_value_t = Engine::Page)]
        engine: Engine,

        /// Which fields the `page` engine places on each page.
        #[arg(long, value_enum, default_value_t = LayoutArg::Body)]
        layout: LayoutArg,

        /// Add an outline entry for every headline (requires the `bookmarks` feature).
        #[arg(long)]
        bookmarks: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Engine {
    Page,
    Flow,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Body,
    Full,
}

impl From<LayoutArg> for Layout {
    fn from(layout: LayoutArg) -> Self {
        match layout {
            LayoutArg::Body => Layout::BodyOnly,
            LayoutArg::Full => Layout::Full,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sample {
            output,
            engine,
            layout,
            bookmarks,
        } => run_sample(output, engine, layout, bookmarks),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn run_sample(
    output: PathBuf,
    engine: Engine,
    layout: LayoutArg,
    bookmarks: bool,
) -> Result<(), Box<dyn Error>> {
    let mut presentation = presenter::demo::sample_presentation()?;
    presentation.set_output_path(output);

    let renderer: Box<dyn Renderer> = match engine {
        Engine::Page => Box::new(PageRenderer::new().with_layout(layout.into())),
        Engine::Flow => Box::new(FlowRenderer::new()),
    };

    let document = render(&presentation, renderer.as_ref(), bookmarks)?;
    println!(
        "Generated {} ({} pages, {} bytes)",
        document.path.display(),
        document.pages,
        document.bytes
    );
    Ok(())
}

#[cfg(feature = "bookmarks")]
fn render(
    presentation: &Presentation,
    renderer: &dyn Renderer,
    bookmarks: bool,
) -> Result<presenter::RenderedDocument, Box<dyn Error>> {
    if bookmarks {
        Ok(presentation.render_with_bookmarks(renderer)?)
    } else {
        Ok(presentation.render_with(renderer)?)
    }
}

#[cfg(not(feature = "bookmarks"))]
fn render(
    presentation: &Presentation,
    renderer: &dyn Renderer,
    bookmarks: bool,
) -> Result<presenter::RenderedDocument, Box<dyn Error>> {
    if bookmarks {
        return Err("Enable the `bookmarks` feature to render bookmarked output".into());
    }
    Ok(presentation.render_with(renderer)?)
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
