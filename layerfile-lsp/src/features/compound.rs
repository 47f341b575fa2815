//! Splitting of `KEY<delimiter>VALUE` tokens into a key span and a value span.
//!
//! The token text is split on the delimiter pattern. The first segment is the key; the value
//! span then runs from the start of the value to the end of the token, so anything after a
//! second delimiter (`FOO bar baz`, `A=b=c`) stays inside the value span. Where the value starts
//! depends on [`ValueSpanMode`]:
//!
//! - `AbsorbToEnd` searches for the second segment's text, starting at the end of the key.
//! - `Structural` starts right after the first delimiter match.
//!
//! The two only disagree when the second segment is empty because the delimiter repeats
//! (`A==B`): the search then lands on the second delimiter itself.
//!
//! A token ending in its delimiter (`FOO=`) has an empty value. `Structural` then gives a
//! zero-length value span starting at the end of the token, one past its last character. The
//! encoder drops zero-length spans, so it never reaches the editor.

use layerfile_config::ValueSpanMode;
use layerfile_parser::lexing::tokens::utf16_len;
use layerfile_parser::Token;
use once_cell::sync::Lazy;
use regex::Regex;

use super::legend::Category;
use super::semantic_tokens::HighlightSpan;

static EQUALS: Lazy<Regex> = Lazy::new(|| Regex::new(r"=").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
// Alternation order matters: the longest operators must be tried first
static COMPARISON: Lazy<Regex> = Lazy::new(|| Regex::new(r"!=~|!=|=~|=").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `KEY=value`
    Equals,
    /// `KEY value with spaces`
    Whitespace,
    /// `KEY!=~value`, `KEY!=value`, `KEY=~value`, `KEY=value`
    Comparison,
}

impl Delimiter {
    pub fn pattern(self) -> &'static Regex {
        match self {
            Delimiter::Equals => &EQUALS,
            Delimiter::Whitespace => &WHITESPACE,
            Delimiter::Comparison => &COMPARISON,
        }
    }
}

/// Categories and delimiter for one compound token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompoundSpec {
    pub key: Category,
    pub value: Category,
    pub delimiter: Delimiter,
}

/// Split a compound token into `[key, value]` spans.
///
/// Returns `None` when the delimiter does not occur in the token text.
pub fn split(
    token: &Token<'_>,
    spec: CompoundSpec,
    mode: ValueSpanMode,
) -> Option<[HighlightSpan; 2]> {
    let text = token.text;
    let pattern = spec.delimiter.pattern();

    let mut parts = pattern.splitn(text, 3);
    let key = parts.next()?;
    let value = parts.next()?;

    let value_start = match mode {
        ValueSpanMode::AbsorbToEnd => text[key.len()..]
            .find(value)
            .map(|offset| key.len() + offset)?,
        ValueSpanMode::Structural => pattern.find(text)?.end(),
    };

    let line = token.line.saturating_sub(1);
    let value_column = utf16_len(&text[..value_start]);

    Some([
        HighlightSpan::new(line, token.column, utf16_len(key), spec.key),
        HighlightSpan::new(
            line,
            token.column + value_column,
            token.len_utf16() - value_column,
            spec.value,
        ),
    ])
}
