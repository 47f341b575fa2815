//! Lexer module for the Layerfile format
//!
//! This module contains the token definitions and the mode-switching lexer built on logos.

pub mod lexer_impl;
pub mod modes;
pub mod tokens;

pub use lexer_impl::tokenize;
pub use tokens::{Token, TokenKind};
