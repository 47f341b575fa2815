//! Language Server Protocol (LSP) implementation for Layerfiles
//!
//!     This crate gives editors semantic highlighting for Layerfiles. It replaces a per-editor
//!     extension with a single server that any LSP-compatible editor can register for the
//!     `Layerfile` language.
//!
//! Feature Set
//!
//!     Semantic Tokens (textDocument/semanticTokens/full):
//!         - Instruction keywords (`FROM`, `RUN BACKGROUND`, `SKIP REMAINING IF`, ...)
//!         - Line comments and trailing argument comments
//!         - Variables, numbers and file paths in instruction arguments
//!         - `KEY=value`, `KEY value` and `KEY!=value` arguments split into a variable span
//!           for the key and a string span for the value
//!
//!     Parsing into an AST, diagnostics and incremental re-highlighting are not provided.
//!     Every request lexes the whole document again.
//!
//! Architecture
//!
//!     LSP Layer (tower-lsp):
//!         - JSON-RPC, capability negotiation, request routing
//!
//!     Server Layer ([`server`]):
//!         - Implements the LanguageServer trait
//!         - Keeps the latest full text of each open document
//!         - Encodes spans into the relative LSP wire format using the [`Legend`]
//!
//!     Feature Layer ([`features`]):
//!         - [`features::legend`]: the category and modifier vocabulary
//!         - [`features::classifier`]: token kind to category table
//!         - [`features::compound`]: key/value splitting
//!         - [`features::semantic_tokens`]: the span collector
//!         - Pure functions over the token stream, with the dense unit tests
//!
//! Usage
//!
//!     $ layerfile-lsp
//!     Starts the language server on stdin/stdout for editor integration. Settings are read
//!     from `layerfile-lsp.toml` in the working directory when present.
//!
//! [`Legend`]: features::legend::Legend

pub mod features;
pub mod logging;
pub mod server;

pub use features::legend::{Category, Legend, Modifier};
pub use features::semantic_tokens::{collect_semantic_spans, HighlightSpan, SpanCollector};
pub use server::{encode_semantic_tokens, LayerfileLanguageServer};
