//! Lexer modes
//!
//! Each line is lexed in two steps. [`Head`] recognises the instruction keyword (or a line
//! comment); the keyword then selects an [`ArgumentMode`] that lexes the rest of the line with one
//! of the argument enums below. Every argument enum is total over a line's content: any
//! character is covered by some pattern, so the argument lexers never produce errors.
//!
//! Line content never includes the line terminator, so the patterns only have to stay clear of
//! `\n` for safety.
//!
//! logos does not backtrack out of a failed longer match. Patterns here are kept so that once a
//! token has started, every longer prefix still matches some variant. Anything needing lookahead
//! (multi-word keywords, trimming trailing blanks, values spanning several words) is done by the
//! tokenizer on top of these enums.

use super::tokens::TokenKind;
use logos::Logos;

/// Tokens valid at the start of a line.
///
/// Only the first word of an instruction is matched here. Multi-word keywords such as
/// `SKIP REMAINING IF` are completed by [`Head::instruction`].
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Head {
    #[token("BUTTON")]
    Button,
    #[token("CACHE")]
    Cache,
    #[token("CHECKPOINT")]
    Checkpoint,
    #[token("CLONE")]
    Clone,
    #[token("COPY")]
    Copy,
    #[token("ENV")]
    Env,
    #[token("BUILD")]
    Build,
    #[token("FROM")]
    From,
    #[token("MEMORY")]
    Memory,
    #[token("RUN")]
    Run,
    #[token("SECRET")]
    Secret,
    #[token("SETUP")]
    Setup,
    #[token("SKIP")]
    Skip,
    #[token("SPLIT")]
    Split,
    #[token("EXPOSE")]
    Expose,
    #[token("USER")]
    User,
    #[token("WAIT")]
    Wait,
    #[token("WORKDIR")]
    Workdir,

    #[regex(r"#[^\n]*")]
    Comment,
    #[regex(r"[ \t]+")]
    Whitespace,
}

/// How the arguments of an instruction are cut into tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentMode {
    /// Whitespace separated words, each one a `value` token.
    Words { value: TokenKind, comment: TokenKind },
    /// Free text up to a trailing `#` comment.
    Line { value: TokenKind, comment: TokenKind },
    /// A shell command: everything after the keyword, `#` included.
    Command,
    /// `ENV` assignments, either `KEY=value ...` or `KEY value with spaces`.
    Env,
    /// `SKIP REMAINING IF` conditions joined by `AND`.
    Conditions,
}

/// A keyword only counts when it is not the prefix of a longer word.
pub fn at_word_boundary(rest: &str) -> bool {
    rest.is_empty() || rest.starts_with([' ', '\t'])
}

/// Byte length of `words` at the start of `rest`, each preceded by blanks.
///
/// The last word must end at a word boundary: `RUN BACKGROUNDER` is a plain `RUN`.
fn continuation(rest: &str, words: &[&str]) -> Option<usize> {
    let mut tail = rest;
    for word in words {
        let unblanked = tail.trim_start_matches([' ', '\t']);
        if unblanked.len() == tail.len() {
            return None;
        }
        tail = unblanked.strip_prefix(word)?;
    }
    at_word_boundary(tail).then_some(rest.len() - tail.len())
}

impl Head {
    /// Resolve the instruction starting with this keyword.
    ///
    /// `rest` is the line after the keyword. Returns the instruction's token kind, its argument
    /// mode and how many bytes of `rest` belong to the keyword. `None` for comments, whitespace
    /// and first words whose continuation is missing (`BUILD` without `ENV`).
    pub fn instruction(self, rest: &str) -> Option<(TokenKind, ArgumentMode, usize)> {
        let (kind, keyword_rest) = match self {
            Head::Button => (TokenKind::Button, 0),
            Head::Cache => (TokenKind::Cache, 0),
            Head::Checkpoint => (TokenKind::Checkpoint, 0),
            Head::Clone => (TokenKind::Clone, 0),
            Head::Copy => (TokenKind::Copy, 0),
            Head::Env => (TokenKind::Env, 0),
            Head::Build => (TokenKind::BuildEnv, continuation(rest, &["ENV"])?),
            Head::From => (TokenKind::From, 0),
            Head::Memory => (TokenKind::Memory, 0),
            Head::Run => {
                if let Some(len) = continuation(rest, &["BACKGROUND"]) {
                    (TokenKind::RunBackground, len)
                } else if let Some(len) = continuation(rest, &["REPEATABLE"]) {
                    (TokenKind::RunRepeatable, len)
                } else {
                    (TokenKind::Run, 0)
                }
            }
            Head::Secret => (TokenKind::SecretEnv, continuation(rest, &["ENV"])?),
            Head::Setup => (TokenKind::SetupFile, continuation(rest, &["FILE"])?),
            Head::Skip => (
                TokenKind::SkipRemainingIf,
                continuation(rest, &["REMAINING", "IF"])?,
            ),
            Head::Split => (TokenKind::Split, 0),
            Head::Expose => (TokenKind::ExposeWebsite, continuation(rest, &["WEBSITE"])?),
            Head::User => (TokenKind::User, 0),
            Head::Wait => (TokenKind::Wait, 0),
            Head::Workdir => (TokenKind::Workdir, 0),
            Head::Comment | Head::Whitespace => return None,
        };
        Some((kind, argument_mode(kind)?, keyword_rest))
    }
}

fn argument_mode(instruction: TokenKind) -> Option<ArgumentMode> {
    use ArgumentMode::*;

    let files = Words {
        value: TokenKind::File,
        comment: TokenKind::FileComment,
    };
    let words = |value: TokenKind, comment: TokenKind| Words { value, comment };

    let mode = match instruction {
        TokenKind::Button => Line {
            value: TokenKind::ButtonData,
            comment: TokenKind::ButtonComment,
        },
        TokenKind::Cache
        | TokenKind::Copy
        | TokenKind::SetupFile
        | TokenKind::Wait
        | TokenKind::Workdir => files,
        TokenKind::Checkpoint => words(TokenKind::CheckpointValue, TokenKind::CheckpointComment),
        TokenKind::Clone => words(TokenKind::CloneValue, TokenKind::Comment),
        TokenKind::Env => Env,
        TokenKind::BuildEnv => words(TokenKind::BuildEnvValue, TokenKind::BuildEnvComment),
        TokenKind::From => words(TokenKind::FromImage, TokenKind::Comment),
        TokenKind::Memory => words(TokenKind::MemoryAmount, TokenKind::MemoryComment),
        TokenKind::Run | TokenKind::RunBackground | TokenKind::RunRepeatable => Command,
        TokenKind::SecretEnv => words(TokenKind::SecretEnvValue, TokenKind::SecretEnvComment),
        TokenKind::SkipRemainingIf => Conditions,
        TokenKind::Split => words(TokenKind::SplitNumber, TokenKind::Comment),
        TokenKind::ExposeWebsite => words(TokenKind::WebsiteItem, TokenKind::WebsiteComment),
        TokenKind::User => words(TokenKind::UserName, TokenKind::UserComment),
        _ => return None,
    };
    Some(mode)
}

/// Arguments made of whitespace separated words
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordArg {
    #[regex(r"[ \t]+")]
    Whitespace,
    #[regex(r"#[^\n]*")]
    Comment,
    #[regex(r"[^ \t\n#][^ \t\n]*")]
    Word,
}

/// Free text arguments
///
/// `Text` runs up to a comment or the end of the line, trailing blanks included. The
/// tokenizer trims them off.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineArg {
    #[regex(r"[ \t]+")]
    Whitespace,
    #[regex(r"#[^\n]*")]
    Comment,
    #[regex(r"[^ \t\n#][^\n#]*")]
    Text,
}

/// Shell commands
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandArg {
    #[regex(r"[ \t]+")]
    Whitespace,
    #[regex(r"[^ \t\n][^\n]*")]
    Command,
}

/// `ENV` arguments, one word at a time.
///
/// Quoted values with blanks and the `KEY value with spaces` form span several words; the
/// tokenizer extends `Assignment` and `Bare` tokens over them.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvArg {
    #[regex(r"[ \t]+")]
    Whitespace,
    #[regex(r"#[^\n]*")]
    Comment,
    #[regex(r"[^ \t\n#=]+=[^ \t\n]*", priority = 10)]
    Assignment,
    #[regex(r"[^ \t\n#][^ \t\n]*", priority = 1)]
    Bare,
}

/// `SKIP REMAINING IF` arguments
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionArg {
    #[regex(r"[ \t]+")]
    Whitespace,
    #[regex(r"#[^\n]*")]
    Comment,
    #[token("AND")]
    And,
    #[regex(r"[^ \t\n#=!~]+(!=~|!=|=~|=)[^ \t\n]*", priority = 10)]
    Condition,
    #[regex(r"[^ \t\n#][^ \t\n]*", priority = 1)]
    Word,
}
