//! Error type shared by the rendering pipeline.

use std::fmt;
use std::io;
use std::path::PathBuf;

#[cfg(feature = "bookmarks")]
use crate::bookmarks::BookmarkError;

/// Errors that can occur while rendering a presentation to disk.
#[derive(Debug)]
pub enum RenderError {
    /// `render` was called before an output path was configured.
    MissingOutputPath,
    /// The output file could not be created or written.
    Io {
        /// Path of the file that failed to persist.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// The fixed-position page engine rejected the document.
    Engine(String),
    /// The flowing layout engine failed to lay out the document.
    Layout(genpdf::error::Error),
    /// The fonts required by the flowing layout engine could not be loaded.
    FontLoad(genpdf::error::Error),
    /// The outline could not be embedded into the rendered bytes.
    #[cfg(feature = "bookmarks")]
    Bookmarks(BookmarkError),
}

impl RenderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns whether the error was caused by persisting the output file.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOutputPath => write!(f, "No output path configured for the presentation"),
            Self::Io { path, source } => {
                write!(f, "Failed to write presentation to {}: {}", path.display(), source)
            }
            Self::Engine(message) => write!(f, "PDF engine error: {message}"),
            Self::Layout(err) => write!(f, "Failed to lay out presentation: {err}"),
            Self::FontLoad(err) => write!(f, "Failed to load presentation fonts: {err}"),
            #[cfg(feature = "bookmarks")]
            Self::Bookmarks(err) => write!(f, "Failed to add bookmarks: {err}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Layout(err) | Self::FontLoad(err) => Some(err),
            #[cfg(feature = "bookmarks")]
            Self::Bookmarks(err) => Some(err),
            Self::MissingOutputPath | Self::Engine(_) => None,
        }
    }
}

impl From<genpdf::error::Error> for RenderError {
    fn from(err: genpdf::error::Error) -> Self {
        Self::Layout(err)
    }
}

#[cfg(feature = "bookmarks")]
impl From<BookmarkError> for RenderError {
    fn from(err: BookmarkError) -> Self {
        Self::Bookmarks(err)
    }
}
