//! # layerfile-parser
//!
//! Lexing for the Layerfile format.
//!
//! A Layerfile is a line oriented list of instructions (`FROM`, `RUN`, `ENV`, `SKIP REMAINING IF`,
//! ...). Every line begins in instruction position; the instruction keyword decides how the rest of
//! the line is cut into tokens. See [`lexing`] for the token kinds and the per-instruction modes.
//!
//! The lexer never fails. Text it does not understand is handed out as
//! [`TokenKind::Unknown`](lexing::TokenKind::Unknown) so downstream consumers (highlighting,
//! mostly) can degrade gracefully instead of giving up on the whole document.

pub mod lexing;

pub use lexing::{tokenize, Token, TokenKind};
