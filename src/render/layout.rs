// src/render/layout.rs

//! Text layout primitives shared by every view.
//!
//! Views implement `Display` by composing these helpers, so the same page
//! can be written to stdout or captured in a test.

use std::fmt::{self, Write};

use unicode_segmentation::UnicodeSegmentation;

/// Width of borders and separators.
pub const WIDTH: usize = 60;

/// Write a boxed header.
pub fn header(out: &mut impl Write, title: &str) -> fmt::Result {
    let border = "═".repeat(WIDTH);
    writeln!(out, "{border}")?;
    writeln!(out, "  {title}")?;
    writeln!(out, "{border}")
}

/// Write a section heading followed by a thin rule.
pub fn section(out: &mut impl Write, title: &str) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "{title}")?;
    separator(out)
}

/// Write a separator line.
pub fn separator(out: &mut impl Write) -> fmt::Result {
    writeln!(out, "{}", "─".repeat(WIDTH))
}

/// Write an indented line.
pub fn sub_item(out: &mut impl Write, message: &str) -> fmt::Result {
    writeln!(out, "    {message}")
}

/// Write a `key: value` summary block.
pub fn summary(out: &mut impl Write, title: &str, items: &[(&str, String)]) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "[SUMMARY] {title}")?;
    for (key, value) in items {
        writeln!(out, "    {key}: {value}")?;
    }
    Ok(())
}

/// Inline badge text, e.g. `[Approved]`.
pub fn badge(label: &str) -> String {
    format!("[{label}]")
}

/// Pluralize a count: `1 source`, `3 sources`.
pub fn count(n: usize, singular: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {singular}s")
    }
}

/// Split a line into chunks of at most `width` graphemes. A blank line
/// yields one empty chunk.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.is_empty() || width == 0 {
        return vec![String::new()];
    }
    graphemes.chunks(width).map(|chunk| chunk.concat()).collect()
}

/// Right-pad to `width` graphemes.
pub fn pad(text: &str, width: usize) -> String {
    let len = text.graphemes(true).count();
    format!("{text}{}", " ".repeat(width.saturating_sub(len)))
}
