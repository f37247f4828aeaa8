//! Display-width table for the built-in samples or user-supplied text.

use std::io::{self, Write};

use crate::core::text::samples::SAMPLES;
use crate::core::text::width::inspect;

const LABEL_COLUMN: usize = 16;

/// Render `text` safely: control characters are escaped.
fn printable(text: &str) -> String {
    let mut shown = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_control() {
            shown.extend(ch.escape_debug());
        } else {
            shown.push(ch);
        }
    }
    shown
}

/// Format one table row for `text`.
pub fn width_line(label: &str, text: &str) -> String {
    let prefix = format!("{:<width$}", format!("{label}:"), width = LABEL_COLUMN);
    let Some(info) = inspect(text) else {
        return format!("{prefix}<empty>  width=0");
    };

    let width = info
        .width
        .map_or_else(|| "n/a".to_string(), |width| width.to_string());
    let mut line = format!(
        "{prefix}{}  U+{:04X}  cp={}  bytes={}  width={width}",
        printable(text),
        info.code_point(),
        info.code_point(),
        info.encoded_len,
    );
    if let Some(grapheme) = info.grapheme_width {
        line.push_str(&format!("  grapheme width={grapheme}"));
    }
    line
}

/// Write the table. Empty `inputs` means the built-in samples.
pub fn write_width_report<W: Write + ?Sized>(out: &mut W, inputs: &[String]) -> io::Result<()> {
    writeln!(out, "=== Display width ===")?;
    if inputs.is_empty() {
        for sample in SAMPLES {
            writeln!(out, "{}", width_line(sample.label, sample.text))?;
        }
    } else {
        for (index, text) in inputs.iter().enumerate() {
            writeln!(out, "{}", width_line(&format!("input {}", index + 1), text))?;
        }
    }
    Ok(())
}
