//! Code point and grapheme display width.

use emojis::get as emoji_get;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

/// Column width of a single code point; `None` for control characters.
pub fn codepoint_width(ch: char) -> Option<usize> {
    UnicodeWidthChar::width(ch)
}

pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.is_empty() {
        return 0;
    }

    if emoji_get(grapheme).is_some() {
        return 2;
    }

    grapheme
        .chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum()
}

/// Width facts about the leading code point of a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodePointInfo {
    pub ch: char,
    pub encoded_len: usize,
    pub width: Option<usize>,
    /// Width of the leading grapheme cluster, set only when the text holds
    /// more than one code point.
    pub grapheme_width: Option<usize>,
}

impl CodePointInfo {
    pub fn code_point(&self) -> u32 {
        u32::from(self.ch)
    }
}

/// Inspect the leading code point of `text`. Empty text yields `None`.
pub fn inspect(text: &str) -> Option<CodePointInfo> {
    let mut chars = text.chars();
    let ch = chars.next()?;
    let grapheme_width = if chars.next().is_some() {
        text.graphemes(true).next().map(grapheme_width)
    } else {
        None
    };

    Some(CodePointInfo {
        ch,
        encoded_len: ch.len_utf8(),
        width: codepoint_width(ch),
        grapheme_width,
    })
}
