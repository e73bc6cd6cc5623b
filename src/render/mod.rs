//! Turns a post into the fixed receipt layout.
//!
//! Rendering is pure: it produces an ordered directive sequence and nothing
//! else. The poll loop decides where the directives go (printer, log, both).

use chrono::{DateTime, Utc};

use crate::domain::Post;

/// Width of the underlined separator drawn between posts.
pub const SEPARATOR_WIDTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justification {
    Left,
    Right,
}

/// One atomic printer instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintDirective {
    Justify(Justification),
    Underline(bool),
    WriteRaw(Vec<u8>),
    WriteLine(String),
}

/// Lay out one post. Image posts and posts without text produce nothing.
pub fn render_post(post: &Post) -> Vec<PrintDirective> {
    let Some(message) = post.body() else {
        return Vec::new();
    };
    if post.has_image() {
        return Vec::new();
    }

    use PrintDirective::*;
    vec![
        Justify(Justification::Left),
        WriteRaw(transliterate(message)),
        WriteLine(String::new()),
        Justify(Justification::Right),
        WriteLine(format_timestamp(post.created_at)),
        Justify(Justification::Left),
        WriteLine(String::new()),
        Underline(true),
        WriteLine(" ".repeat(SEPARATOR_WIDTH)),
        Underline(false),
        WriteLine(String::new()),
        WriteLine(String::new()),
    ]
}

/// `YYYY-MM-DD HH:MM:SS`, UTC, whole seconds.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Map text onto the printer's single-byte code page (Latin-1). Characters
/// outside the page are dropped rather than failing the print job.
pub fn transliterate(text: &str) -> Vec<u8> {
    text.chars()
        .filter_map(|c| {
            let cp = c as u32;
            (cp <= 0xFF).then_some(cp as u8)
        })
        .collect()
}
