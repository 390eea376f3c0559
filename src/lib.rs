//! Core entry point for the presenter crate.
//!
//! A [`Presentation`] collects a shared header and footer together with an ordered list of
//! [`Screen`]s and renders them as a PDF document with one page per screen.

pub mod demo;
pub mod error;
pub mod fonts;
pub mod images;
pub mod model;
pub mod presentation;
pub mod render;

#[cfg(feature = "bookmarks")]
pub mod bookmarks;

pub use error::RenderError;
pub use model::{Footer, Header, PageRecord, Screen};
pub use presentation::{Presentation, RenderedDocument};
pub use render::{
    FlowRenderer, Layout, Orientation, PageRenderer, PageSetup, RenderedPdf, Renderer,
};
