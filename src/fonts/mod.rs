//! Font loading for the flowing layout engine.
//!
//! `genpdf` needs the metrics of a real font family, so [`crate::render::FlowRenderer`] looks for
//! the Roboto family in the following places, in order:
//!
//! 1. the directory named by the `PRESENTER_FONTS_DIR` environment variable,
//! 2. `assets/fonts` next to the running executable,
//! 3. `assets/fonts` inside the crate directory.
//!
//! A directory named by `PRESENTER_FONTS_DIR` that lacks any of the files is skipped with a
//! warning and the search falls back to the remaining locations.
//! [`crate::render::FlowRenderer::with_font_dir`] bypasses the search entirely.
//!
//! The fixed-position [`crate::render::PageRenderer`] uses a PDF built-in font and needs none of
//! this.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use genpdf::fonts::{self, FontData, FontFamily};
use log::{debug, warn};

/// Name of the bundled font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

/// Environment variable overriding the font search path.
pub const FONTS_DIR_ENV: &str = "PRESENTER_FONTS_DIR";

const FONT_FILES: &[&str] = &[
    "Roboto-Regular.ttf",
    "Roboto-Bold.ttf",
    "Roboto-Italic.ttf",
    "Roboto-BoldItalic.ttf",
];

/// Returns the `assets/fonts` directory inside the crate.
pub fn bundled_fonts_source_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

fn env_font_dir() -> Option<PathBuf> {
    env::var_os(FONTS_DIR_ENV)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
}

fn font_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    candidates.extend(env_font_dir());

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            candidates.push(bin_dir.join("assets/fonts"));
        }
    }

    candidates.push(bundled_fonts_source_dir());
    candidates.dedup();
    candidates
}

fn missing_font_files(path: &Path) -> Vec<String> {
    FONT_FILES
        .iter()
        .filter(|name| !path.join(name).is_file())
        .map(|name| name.to_string())
        .collect()
}

/// Explains why `path` cannot serve the font family, or returns `None` when it can.
fn directory_problem(path: &Path) -> Option<String> {
    if !path.is_dir() {
        return Some("directory missing".to_string());
    }
    let missing = missing_font_files(path);
    if missing.is_empty() {
        None
    } else {
        Some(format!("missing files [{}]", missing.join(", ")))
    }
}

fn resolve_font_directory() -> Result<PathBuf, Error> {
    let override_dir = env_font_dir();
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates() {
        let Some(problem) = directory_problem(&candidate) else {
            debug!("Using fonts from {}", candidate.display());
            return Ok(candidate);
        };
        if override_dir.as_ref() == Some(&candidate) {
            warn!(
                "{} points to {} ({}); falling back to the bundled font locations",
                FONTS_DIR_ENV,
                candidate.display(),
                problem
            );
        }
        attempts.push(format!("{} ({})", candidate.display(), problem));
    }

    Err(Error::new(
        format!(
            "Unable to locate the {} font family. Checked: {}. Set {} to a directory containing {}.",
            DEFAULT_FONT_FAMILY_NAME,
            attempts.join(", "),
            FONTS_DIR_ENV,
            FONT_FILES.join(", ")
        ),
        io::Error::new(io::ErrorKind::NotFound, "font directory not found"),
    ))
}

/// Loads the Roboto family as a `genpdf` font family definition.
pub fn default_font_family() -> Result<FontFamily<FontData>, Error> {
    let directory = resolve_font_directory()?;
    load_family(&directory)
}

/// Loads the Roboto family from `directory` without consulting the search path.
pub fn font_family_from_dir(directory: &Path) -> Result<FontFamily<FontData>, Error> {
    if let Some(problem) = directory_problem(directory) {
        return Err(Error::new(
            format!(
                "Unable to load the {} font family from {} ({})",
                DEFAULT_FONT_FAMILY_NAME,
                directory.display(),
                problem
            ),
            io::Error::new(io::ErrorKind::NotFound, "font files not found"),
        ));
    }
    load_family(directory)
}

fn load_family(directory: &Path) -> Result<FontFamily<FontData>, Error> {
    fonts::from_files(directory, DEFAULT_FONT_FAMILY_NAME, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load font family '{}' from {}: {}",
                DEFAULT_FONT_FAMILY_NAME,
                directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

/// Indicates whether the font files required by [`default_font_family`] can be found.
pub fn default_fonts_available() -> bool {
    resolve_font_directory().is_ok()
}

/// Copies a system sans-serif family into a temporary directory under the Roboto file
/// names so the flowing engine can be exercised without the bundled fonts.
#[cfg(test)]
pub(crate) fn stand_in_font_dir() -> Option<tempfile::TempDir> {
    const FAMILIES: &[[&str; 4]] = &[
        [
            "DejaVuSans.ttf",
            "DejaVuSans-Bold.ttf",
            "DejaVuSans-Oblique.ttf",
            "DejaVuSans-BoldOblique.ttf",
        ],
        [
            "LiberationSans-Regular.ttf",
            "LiberationSans-Bold.ttf",
            "LiberationSans-Italic.ttf",
            "LiberationSans-BoldItalic.ttf",
        ],
    ];
    const SEARCH_DIRS: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu",
        "/usr/share/fonts/dejavu",
        "/usr/share/fonts/TTF",
        "/usr/share/fonts/truetype/liberation",
        "/usr/share/fonts/liberation",
    ];

    for dir in SEARCH_DIRS.iter().map(Path::new) {
        for family in FAMILIES {
            if family.iter().all(|name| dir.join(name).is_file()) {
                let target = tempfile::tempdir().ok()?;
                for (source, name) in family.iter().zip(FONT_FILES) {
                    std::fs::copy(dir.join(source), target.path().join(name)).ok()?;
                }
                return Some(target);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_directory_is_always_searched() {
        let candidates = font_directory_candidates();
        assert_eq!(candidates.last(), Some(&bundled_fonts_source_dir()));
    }

    #[test]
    fn empty_directory_reports_every_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(missing_font_files(dir.path()).len(), FONT_FILES.len());
        let problem = directory_problem(dir.path()).expect("incomplete directory");
        assert!(problem.contains("Roboto-BoldItalic.ttf"), "{problem}");
    }

    #[test]
    fn explicit_directory_with_every_file_loads() {
        let Some(dir) = stand_in_font_dir() else {
            eprintln!("Skipping explicit_directory_with_every_file_loads: no system fonts");
            return;
        };
        assert!(directory_problem(dir.path()).is_none());
        font_family_from_dir(dir.path()).expect("load stand-in family");
    }

    #[test]
    fn explicit_directory_errors_name_the_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = font_family_from_dir(dir.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains(&dir.path().display().to_string()), "{message}");
        assert!(message.contains("missing files"), "{message}");
    }
}
