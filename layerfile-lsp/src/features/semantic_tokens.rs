use layerfile_config::ValueSpanMode;
use layerfile_parser::{tokenize, Token};
use serde::Serialize;
use tracing::debug;

use super::classifier::{highlight_for, Highlight};
use super::compound::split;
use super::legend::{Category, Modifier};

/// A highlighted run of text on a single line.
///
/// `line` and `start_character` are 0-based; `start_character` and `length` are in UTF-16 code
/// units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    pub line: u32,
    pub start_character: u32,
    pub length: u32,
    pub category: Category,
    pub modifiers: Vec<Modifier>,
}

impl HighlightSpan {
    pub fn new(line: u32, start_character: u32, length: u32, category: Category) -> Self {
        Self {
            line,
            start_character,
            length,
            category,
            modifiers: Vec::new(),
        }
    }

    /// A span covering the whole token.
    pub fn covering(token: &Token<'_>, category: Category) -> Self {
        Self::new(
            token.line.saturating_sub(1),
            token.column,
            token.len_utf16(),
            category,
        )
    }
}

/// Turns a token stream into highlight spans, in token order.
///
/// Each token is looked at on its own: simple kinds give one span, compound kinds zero or two,
/// everything else nothing. Spans are neither sorted nor deduplicated.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanCollector {
    value_span: ValueSpanMode,
}

impl SpanCollector {
    pub fn new(value_span: ValueSpanMode) -> Self {
        Self { value_span }
    }

    pub fn collect(&self, tokens: &[Token<'_>]) -> Vec<HighlightSpan> {
        let mut spans = Vec::with_capacity(tokens.len() / 2);
        for token in tokens {
            self.push_token(token, &mut spans);
        }
        debug!(
            tokens = tokens.len(),
            spans = spans.len(),
            "collected highlight spans"
        );
        spans
    }

    fn push_token(&self, token: &Token<'_>, spans: &mut Vec<HighlightSpan>) {
        match highlight_for(token.kind) {
            Highlight::Skip => {}
            Highlight::Simple(category) => spans.push(HighlightSpan::covering(token, category)),
            Highlight::Compound(spec) => {
                if let Some(pair) = split(token, spec, self.value_span) {
                    spans.extend(pair);
                }
            }
        }
    }
}

/// Lex `source` and collect its highlight spans.
pub fn collect_semantic_spans(source: &str, value_span: ValueSpanMode) -> Vec<HighlightSpan> {
    SpanCollector::new(value_span).collect(&tokenize(source))
}
