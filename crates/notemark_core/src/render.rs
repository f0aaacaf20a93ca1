//! Markdown preview rendering.
//!
//! # Responsibility
//! - Convert note content to HTML through the external renderer.
//! - Keep the renderer configuration (extended syntax, hard line breaks,
//!   raw-HTML neutralization) in one place.
//!
//! # Invariants
//! - Raw HTML in the source never reaches the output unescaped.
//! - Preview rendering is total: empty content and renderer failures both
//!   degrade to placeholder paragraphs.

use log::warn;
use pulldown_cmark::{html, Event, Options, Parser};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Paragraph shown in place of an empty note body.
pub const EMPTY_PREVIEW_HTML: &str =
    "<p class=\"preview-empty\"><em>Start writing your note...</em></p>";

/// Paragraph shown when HTML generation fails.
pub const RENDER_ERROR_HTML: &str = "<p class=\"preview-error\">Error rendering markdown</p>";

pub type RenderResult<T> = Result<T, RenderError>;

/// HTML generation failure.
#[derive(Debug)]
pub enum RenderError {
    Write(std::io::Error),
    InvalidUtf8(std::string::FromUtf8Error),
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Write(err) => write!(f, "html writer failed: {err}"),
            Self::InvalidUtf8(err) => write!(f, "html output is not valid utf-8: {err}"),
        }
    }
}

impl Error for RenderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Write(err) => Some(err),
            Self::InvalidUtf8(err) => Some(err),
        }
    }
}

/// Converts Markdown source to sanitized HTML.
///
/// Configuration:
/// - extended syntax: tables, strikethrough, task lists;
/// - a single newline becomes a hard line break;
/// - raw HTML blocks and inline HTML are re-emitted as escaped text.
pub fn render_markdown(source: &str) -> RenderResult<String> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let events = Parser::new_ext(source, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        Event::Html(raw) => Event::Text(raw),
        Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut buffer = Vec::new();
    html::write_html(&mut buffer, events).map_err(RenderError::Write)?;
    String::from_utf8(buffer).map_err(RenderError::InvalidUtf8)
}

/// Renders the editor preview for the given note content.
///
/// Empty or whitespace-only content yields [`EMPTY_PREVIEW_HTML`]; a
/// renderer failure is logged and yields [`RENDER_ERROR_HTML`].
pub fn preview_html(content: &str) -> String {
    if content.trim().is_empty() {
        return EMPTY_PREVIEW_HTML.to_string();
    }

    match render_markdown(content) {
        Ok(rendered) => rendered,
        Err(err) => {
            warn!("event=render_preview module=render status=error error={err}");
            RENDER_ERROR_HTML.to_string()
        }
    }
}
