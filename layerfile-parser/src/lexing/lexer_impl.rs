//! Implementation of the Layerfile lexer
//!
//! Lines are lexed independently. The [`Head`] lexer finds the instruction keyword, then the
//! remainder of the line is handed to the argument lexer selected by the keyword's
//! [`ArgumentMode`]. The line terminator is emitted as its own [`TokenKind::Newline`] token.

use super::modes::{
    at_word_boundary, ArgumentMode, CommandArg, ConditionArg, EnvArg, Head, LineArg, WordArg,
};
use super::tokens::{utf16_len, Token, TokenKind};
use logos::Logos;
use tracing::trace;

/// Tokenize a Layerfile source into positioned tokens.
///
/// The returned tokens are contiguous: concatenating their text reproduces `source`.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();

    for (index, raw_line) in source.split_inclusive('\n').enumerate() {
        let mut cursor = LineCursor::new(index as u32 + 1, raw_line, &mut tokens);
        let content_len = content_len(raw_line);
        lex_line(&raw_line[..content_len], &mut cursor);
        if content_len < raw_line.len() {
            cursor.push(TokenKind::Newline, raw_line.len() - content_len);
        }
    }

    tokens
}

/// Byte length of a line without its `\n` or `\r\n` terminator.
fn content_len(raw_line: &str) -> usize {
    if let Some(stripped) = raw_line.strip_suffix("\r\n") {
        stripped.len()
    } else if let Some(stripped) = raw_line.strip_suffix('\n') {
        stripped.len()
    } else {
        raw_line.len()
    }
}

/// Appends the tokens of one line, tracking byte offset and UTF-16 column.
struct LineCursor<'src, 'out> {
    line: u32,
    text: &'src str,
    offset: usize,
    column: u32,
    unknown_start: Option<usize>,
    tokens: &'out mut Vec<Token<'src>>,
}

impl<'src, 'out> LineCursor<'src, 'out> {
    fn new(line: u32, text: &'src str, tokens: &'out mut Vec<Token<'src>>) -> Self {
        Self {
            line,
            text,
            offset: 0,
            column: 0,
            unknown_start: None,
            tokens,
        }
    }

    /// Push a token covering the next `len` bytes of the line.
    ///
    /// Adjacent unknown runs are merged into a single token.
    fn push(&mut self, kind: TokenKind, len: usize) {
        let start = self.offset;
        let end = start + len;
        let text = &self.text[start..end];

        let merged = match (kind, self.unknown_start) {
            (TokenKind::Unknown, Some(unknown_start)) => self.tokens.last_mut().map(|last| {
                last.text = &self.text[unknown_start..end];
            }),
            _ => None,
        };
        if merged.is_none() {
            self.tokens
                .push(Token::new(kind, self.line, self.column, text));
            self.unknown_start = (kind == TokenKind::Unknown).then_some(start);
        }

        self.offset = end;
        self.column += utf16_len(text);
    }

    /// Everything left on the line (before the terminator) becomes one unknown token.
    fn push_unknown_rest(&mut self, content_end: usize) {
        if content_end > self.offset {
            trace!(
                line = self.line,
                text = &self.text[self.offset..content_end],
                "unrecognised instruction"
            );
            self.push(TokenKind::Unknown, content_end - self.offset);
        }
    }
}

fn lex_line(content: &str, cursor: &mut LineCursor<'_, '_>) {
    let mut head = Head::lexer(content);

    while let Some(result) = head.next() {
        match result {
            Ok(Head::Whitespace) => cursor.push(TokenKind::Whitespace, head.span().len()),
            Ok(Head::Comment) => cursor.push(TokenKind::Comment, head.span().len()),
            Ok(keyword) => {
                let rest = head.remainder();
                match keyword.instruction(rest) {
                    Some((kind, mode, keyword_rest)) if at_word_boundary(rest) => {
                        cursor.push(kind, head.span().len() + keyword_rest);
                        lex_arguments(&rest[keyword_rest..], mode, cursor);
                    }
                    _ => cursor.push_unknown_rest(content.len()),
                }
                return;
            }
            Err(_) => {
                cursor.push_unknown_rest(content.len());
                return;
            }
        }
    }
}

fn lex_arguments(rest: &str, mode: ArgumentMode, cursor: &mut LineCursor<'_, '_>) {
    match mode {
        ArgumentMode::Words { value, comment } => lex_with(rest, cursor, |token| match token {
            WordArg::Whitespace => TokenKind::Whitespace,
            WordArg::Comment => comment,
            WordArg::Word => value,
        }),
        ArgumentMode::Line { value, comment } => lex_with(rest, cursor, |token| match token {
            LineArg::Whitespace => TokenKind::Whitespace,
            LineArg::Comment => comment,
            LineArg::Text => value,
        }),
        ArgumentMode::Command => lex_with(rest, cursor, |token| match token {
            CommandArg::Whitespace => TokenKind::Whitespace,
            CommandArg::Command => TokenKind::RunCommand,
        }),
        ArgumentMode::Env => lex_env(rest, cursor),
        ArgumentMode::Conditions => lex_with(rest, cursor, |token| match token {
            ConditionArg::Whitespace => TokenKind::Whitespace,
            ConditionArg::Comment => TokenKind::Comment,
            ConditionArg::And => TokenKind::SkipRemainingIfAnd,
            ConditionArg::Condition => TokenKind::SkipRemainingIfValue,
            ConditionArg::Word => TokenKind::Unknown,
        }),
    }
}

/// Lex `text` with one argument enum.
///
/// Trailing blanks of a value token are split off into a separate whitespace token.
fn lex_with<'a, T>(
    text: &'a str,
    cursor: &mut LineCursor<'_, '_>,
    kind_of: impl Fn(T) -> TokenKind,
) where
    T: Logos<'a, Source = str, Extras = ()>,
{
    let mut lexer = T::lexer(text);
    while let Some(result) = lexer.next() {
        let slice = lexer.slice();
        match result {
            Ok(token) => {
                let kind = kind_of(token);
                if kind.is_layout() || slice.starts_with('#') {
                    cursor.push(kind, slice.len());
                } else {
                    let value_len = slice.trim_end_matches([' ', '\t']).len();
                    cursor.push(kind, value_len);
                    if value_len < slice.len() {
                        cursor.push(TokenKind::Whitespace, slice.len() - value_len);
                    }
                }
            }
            Err(_) => cursor.push(TokenKind::Unknown, slice.len()),
        }
    }
}

/// `ENV` arguments.
///
/// A bare key followed by more text is the `KEY value with spaces` form, which takes the rest of
/// the line up to a comment. A quoted assignment value runs to its closing quote.
fn lex_env(text: &str, cursor: &mut LineCursor<'_, '_>) {
    let mut lexer = EnvArg::lexer(text);
    while let Some(result) = lexer.next() {
        let len = lexer.span().len();
        match result {
            Ok(EnvArg::Whitespace) => cursor.push(TokenKind::Whitespace, len),
            Ok(EnvArg::Comment) => cursor.push(TokenKind::EnvComment, len),
            Ok(EnvArg::Assignment) => {
                let extra = closing_quote_len(lexer.slice(), lexer.remainder());
                lexer.bump(extra);
                cursor.push(TokenKind::EnvValue, len + extra);
            }
            Ok(EnvArg::Bare) => {
                let extra = spaced_value_len(lexer.remainder());
                lexer.bump(extra);
                cursor.push(TokenKind::EnvValueWs, len + extra);
            }
            Err(_) => cursor.push(TokenKind::Unknown, len),
        }
    }
}

/// Bytes of `rest` that belong to an assignment whose quoted value is still open.
fn closing_quote_len(assignment: &str, rest: &str) -> usize {
    let Some((_, value)) = assignment.split_once('=') else {
        return 0;
    };
    let Some(quote) = value.chars().next().filter(|c| matches!(c, '"' | '\'')) else {
        return 0;
    };
    if value.len() > 1 && value.ends_with(quote) {
        return 0;
    }
    match rest.find(quote) {
        Some(index) => {
            let after = index + quote.len_utf8();
            after + rest[after..].find([' ', '\t']).unwrap_or(rest.len() - after)
        }
        None => 0,
    }
}

/// Bytes of `rest` that continue a bare key into the `KEY value ...` form.
fn spaced_value_len(rest: &str) -> usize {
    let value = rest.trim_start_matches([' ', '\t']);
    if value.len() == rest.len() || value.is_empty() || value.starts_with('#') {
        return 0;
    }
    let end = comment_start(rest).unwrap_or(rest.len());
    rest[..end].trim_end_matches([' ', '\t']).len()
}

/// Offset of the first `#` that follows a blank.
fn comment_start(text: &str) -> Option<usize> {
    text.match_indices('#')
        .map(|(index, _)| index)
        .find(|&index| text[..index].ends_with([' ', '\t']))
}
