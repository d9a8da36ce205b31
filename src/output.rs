//! Rendered page output.
//!
//! This module contains the [`Output`] struct, which represents a final
//! output file, plus the page shell and the dist-directory plumbing.

use std::fmt::Display;
use std::fs;
use std::time::Instant;

use camino::{Utf8Path, Utf8PathBuf};
use console::Style;

use crate::error::VitrineError;
use crate::html::Element;

const ANSI_BLUE: Style = Style::new().blue();

pub(crate) fn as_overhead(s: Instant) -> impl Display {
    let e = Instant::now();
    let f = format!("(+{}ms)", e.duration_since(s).as_millis());
    ANSI_BLUE.apply_to(f)
}

/// Pretty-URL normalization for HTML outputs.
///
/// - `index` / `index.html` stays `index.html`
/// - `journey` becomes `journey/index.html`
fn normalize(path: impl AsRef<Utf8Path>) -> Utf8PathBuf {
    let mut buffer = path.as_ref().to_path_buf();

    if let Some(file_name) = buffer.file_name() {
        if file_name == "index" || file_name.starts_with("index.") {
            buffer.set_extension("html");
        } else {
            buffer.set_extension("");
            buffer.push("index.html");
        }
    } else {
        buffer.push("index.html");
    }

    buffer
}

/// Represents a single rendered page to be written to the dist directory.
#[derive(Debug, Clone)]
pub struct Output {
    /// The destination path of the file, relative to the dist directory.
    pub path: Utf8PathBuf,
    /// The full textual contents of the page.
    pub content: String,
}

impl Output {
    /// Creates a new `Output` with a normalized pretty URL.
    pub fn html(path: impl AsRef<Utf8Path>, content: impl Into<String>) -> Self {
        Self {
            path: normalize(path),
            content: content.into(),
        }
    }
}

/// Wraps a populated mount container in the host page chrome.
pub fn page_shell(title: &str, container: &Element) -> String {
    let body = container.render();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="/styles.css">
</head>
<body>
{body}
</body>
</html>
"#
    )
}

/// Delete the entire dist directory if it exists.
pub(crate) fn clear_dist(dist: &Utf8Path) -> Result<(), VitrineError> {
    if fs::metadata(dist).is_ok() {
        fs::remove_dir_all(dist).map_err(VitrineError::Clear)?;
    }
    fs::create_dir_all(dist).map_err(VitrineError::Clear)?;
    Ok(())
}

/// Saves all rendered pages under the dist directory.
pub(crate) fn save_pages(pages: &[Output], dist: &Utf8Path) -> Result<(), VitrineError> {
    for page in pages {
        let path = dist.join(&page.path);

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(VitrineError::Write)?;
        }
        fs::write(&path, &page.content).map_err(VitrineError::Write)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("index"), Utf8Path::new("index.html"));
        assert_eq!(normalize("index.html"), Utf8Path::new("index.html"));
        assert_eq!(normalize("journey"), Utf8Path::new("journey/index.html"));
        assert_eq!(
            normalize("journey/index"),
            Utf8Path::new("journey/index.html")
        );
    }

    #[test]
    fn test_page_shell_wraps_container() {
        let container = Element::new("main").attr("id", "gallery");
        let html = page_shell("Gallery", &container);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Gallery</title>"));
        assert!(html.contains(r#"<main id="gallery"></main>"#));
    }

    #[test]
    fn test_save_pages_writes_nested_paths() {
        let dir = tempfile::tempdir().unwrap();
        let dist = Utf8PathBuf::from_path_buf(dir.path().join("dist")).unwrap();

        let pages = [Output::html("journey", "<p>hi</p>")];
        save_pages(&pages, &dist).unwrap();

        let written = fs::read_to_string(dist.join("journey/index.html")).unwrap();
        assert_eq!(written, "<p>hi</p>");
    }
}
