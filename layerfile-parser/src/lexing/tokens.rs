//! Token definitions for the Layerfile format
//!
//! [`TokenKind`] is the closed set of tokens the lexer hands out. Instruction keywords come first,
//! followed by the argument tokens of each instruction mode and the layout tokens shared by all
//! modes. Serialized names follow the grammar's SCREAMING_SNAKE_CASE convention
//! (`ENV_VALUE_WS`, `SKIP_REMAINING_IF_AND`, ...).

use serde::Serialize;

/// All possible tokens in the Layerfile format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    // Instruction keywords
    Button,
    Cache,
    Checkpoint,
    Clone,
    Copy,
    Env,
    BuildEnv,
    From,
    Memory,
    Run,
    RunBackground,
    RunRepeatable,
    SecretEnv,
    SetupFile,
    SkipRemainingIf,
    Split,
    ExposeWebsite,
    User,
    Wait,
    Workdir,

    // Comments: a line comment, or a trailing comment inside an instruction's arguments
    Comment,
    CheckpointComment,
    BuildEnvComment,
    ButtonComment,
    EnvComment,
    WebsiteComment,
    MemoryComment,
    SecretEnvComment,
    UserComment,
    FileComment,

    // Instruction arguments
    ButtonData,
    CheckpointValue,
    CloneValue,
    BuildEnvValue,
    SecretEnvValue,
    EnvValue,
    EnvValueWs,
    FromImage,
    MemoryAmount,
    RunCommand,
    SkipRemainingIfValue,
    SkipRemainingIfAnd,
    SplitNumber,
    UserName,
    WebsiteItem,
    File,

    // Layout
    Whitespace,
    Newline,

    /// Text no mode recognises, up to the end of the line or the next recognisable token.
    Unknown,
}

impl TokenKind {
    /// Check if this token is an instruction keyword
    pub fn is_instruction(&self) -> bool {
        matches!(
            self,
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
        )
    }

    /// Check if this token is whitespace or a line break
    pub fn is_layout(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Newline)
    }
}

/// A lexed token with its source position.
///
/// `line` is 1-based, `column` is 0-based and counted in UTF-16 code units, which is the unit
/// editors (and the LSP wire format) use for character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub line: u32,
    pub column: u32,
    pub text: &'src str,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, line: u32, column: u32, text: &'src str) -> Self {
        Self {
            kind,
            line,
            column,
            text,
        }
    }

    /// Length of the token text in UTF-16 code units.
    pub fn len_utf16(&self) -> u32 {
        utf16_len(self.text)
    }
}

/// Length of `text` in UTF-16 code units.
pub fn utf16_len(text: &str) -> u32 {
    text.encode_utf16().count() as u32
}
