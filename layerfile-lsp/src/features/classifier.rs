//! Token kind to highlighting category mapping.
//!
//! Every [`TokenKind`] is mapped exactly once in [`highlight_for`]. The match is exhaustive, so a
//! new kind in the lexer does not compile until it has been given a highlight here.

use layerfile_parser::{Token, TokenKind};

use super::compound::{CompoundSpec, Delimiter};
use super::legend::Category;
use super::semantic_tokens::HighlightSpan;

/// How tokens of one kind are highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// No span. Layout, free-form payloads and anything the lexer could not make sense of.
    Skip,
    /// One span covering the whole token.
    Simple(Category),
    /// A `KEY<delimiter>VALUE` token split into two spans.
    Compound(CompoundSpec),
}

const ASSIGNMENT: CompoundSpec = CompoundSpec {
    key: Category::Variable,
    value: Category::String,
    delimiter: Delimiter::Equals,
};

const SPACED_ASSIGNMENT: CompoundSpec = CompoundSpec {
    key: Category::Variable,
    value: Category::String,
    delimiter: Delimiter::Whitespace,
};

const CONDITION: CompoundSpec = CompoundSpec {
    key: Category::Variable,
    value: Category::String,
    delimiter: Delimiter::Comparison,
};

pub fn highlight_for(kind: TokenKind) -> Highlight {
    use Highlight::*;

    match kind {
        TokenKind::Button
        | TokenKind::Cache
        | TokenKind::Checkpoint
        | TokenKind::Clone
        | TokenKind::Copy
        | TokenKind::Env
        | TokenKind::BuildEnv
        | TokenKind::From
        | TokenKind::Memory
        | TokenKind::Run
        | TokenKind::RunBackground
        | TokenKind::RunRepeatable
        | TokenKind::SecretEnv
        | TokenKind::SetupFile
        | TokenKind::SkipRemainingIf
        | TokenKind::Split
        | TokenKind::ExposeWebsite
        | TokenKind::User
        | TokenKind::Wait
        | TokenKind::Workdir
        | TokenKind::SkipRemainingIfAnd => Simple(Category::Keyword),

        TokenKind::Comment
        | TokenKind::CheckpointComment
        | TokenKind::BuildEnvComment
        | TokenKind::ButtonComment
        | TokenKind::EnvComment
        | TokenKind::WebsiteComment
        | TokenKind::MemoryComment
        | TokenKind::SecretEnvComment
        | TokenKind::UserComment
        | TokenKind::FileComment => Simple(Category::Comment),

        TokenKind::BuildEnvValue
        | TokenKind::CheckpointValue
        | TokenKind::ButtonData
        | TokenKind::SecretEnvValue
        | TokenKind::UserName => Simple(Category::Variable),

        TokenKind::MemoryAmount | TokenKind::SplitNumber => Simple(Category::Number),

        TokenKind::File => Simple(Category::String),

        TokenKind::EnvValueWs => Compound(SPACED_ASSIGNMENT),
        TokenKind::EnvValue => Compound(ASSIGNMENT),
        TokenKind::SkipRemainingIfValue => Compound(CONDITION),

        TokenKind::CloneValue
        | TokenKind::FromImage
        | TokenKind::RunCommand
        | TokenKind::WebsiteItem
        | TokenKind::Whitespace
        | TokenKind::Newline
        | TokenKind::Unknown => Skip,
    }
}

/// Classify a single token. Only kinds with a [`Highlight::Simple`] mapping produce a span;
/// compound kinds go through [`split`](super::compound::split) instead.
pub fn classify(token: &Token<'_>) -> Option<HighlightSpan> {
    match highlight_for(token.kind) {
        Highlight::Simple(category) => Some(HighlightSpan::covering(token, category)),
        Highlight::Skip | Highlight::Compound(_) => None,
    }
}
