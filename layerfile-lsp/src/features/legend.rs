//! Highlighting vocabulary shared with the editor.
//!
//! The [`Legend`] is published once during `initialize`; every encoded semantic token refers to
//! its categories and modifiers by index. It is built once and never mutated afterwards, so a
//! single instance can be shared by all requests.

use std::collections::HashMap;

use serde::Serialize;
use tower_lsp::lsp_types::{SemanticTokenModifier, SemanticTokenType, SemanticTokensLegend};

/// Semantic highlighting categories, in legend order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Comment,
    String,
    Keyword,
    Number,
    Regexp,
    Operator,
    Namespace,
    Type,
    Struct,
    Class,
    Interface,
    Enum,
    TypeParameter,
    Function,
    Method,
    Decorator,
    Macro,
    Variable,
    Parameter,
    Property,
    Label,
}

impl Category {
    pub const ALL: [Category; 21] = [
        Category::Comment,
        Category::String,
        Category::Keyword,
        Category::Number,
        Category::Regexp,
        Category::Operator,
        Category::Namespace,
        Category::Type,
        Category::Struct,
        Category::Class,
        Category::Interface,
        Category::Enum,
        Category::TypeParameter,
        Category::Function,
        Category::Method,
        Category::Decorator,
        Category::Macro,
        Category::Variable,
        Category::Parameter,
        Category::Property,
        Category::Label,
    ];

    /// The token type name as registered with the editor.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Comment => "comment",
            Category::String => "string",
            Category::Keyword => "keyword",
            Category::Number => "number",
            Category::Regexp => "regexp",
            Category::Operator => "operator",
            Category::Namespace => "namespace",
            Category::Type => "type",
            Category::Struct => "struct",
            Category::Class => "class",
            Category::Interface => "interface",
            Category::Enum => "enum",
            Category::TypeParameter => "typeParameter",
            Category::Function => "function",
            Category::Method => "method",
            Category::Decorator => "decorator",
            Category::Macro => "macro",
            Category::Variable => "variable",
            Category::Parameter => "parameter",
            Category::Property => "property",
            Category::Label => "label",
        }
    }
}

/// Semantic token modifiers, in legend order. None are emitted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Modifier {
    Declaration,
    Documentation,
    Readonly,
    Static,
    Abstract,
    Deprecated,
    Modification,
    Async,
}

impl Modifier {
    pub const ALL: [Modifier; 8] = [
        Modifier::Declaration,
        Modifier::Documentation,
        Modifier::Readonly,
        Modifier::Static,
        Modifier::Abstract,
        Modifier::Deprecated,
        Modifier::Modification,
        Modifier::Async,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Declaration => "declaration",
            Modifier::Documentation => "documentation",
            Modifier::Readonly => "readonly",
            Modifier::Static => "static",
            Modifier::Abstract => "abstract",
            Modifier::Deprecated => "deprecated",
            Modifier::Modification => "modification",
            Modifier::Async => "async",
        }
    }
}

/// Ordered category and modifier names with stable indices.
#[derive(Debug, Clone)]
pub struct Legend {
    categories: Vec<&'static str>,
    modifiers: Vec<&'static str>,
    category_index: HashMap<&'static str, u32>,
    modifier_index: HashMap<&'static str, u32>,
}

impl Legend {
    /// Build a legend from ordered name lists. A name listed twice keeps its first index.
    pub fn new(categories: &[&'static str], modifiers: &[&'static str]) -> Self {
        Self {
            categories: categories.to_vec(),
            modifiers: modifiers.to_vec(),
            category_index: first_seen_index(categories),
            modifier_index: first_seen_index(modifiers),
        }
    }

    /// The full Layerfile vocabulary.
    pub fn standard() -> Self {
        Self::new(
            &Category::ALL.map(Category::as_str),
            &Modifier::ALL.map(Modifier::as_str),
        )
    }

    pub fn categories(&self) -> &[&'static str] {
        &self.categories
    }

    pub fn modifiers(&self) -> &[&'static str] {
        &self.modifiers
    }

    /// Index of a category name. Unknown names fall back to the first category.
    pub fn index_of(&self, name: &str) -> u32 {
        self.category_index.get(name).copied().unwrap_or(0)
    }

    /// Bitset of modifier indices. Modifiers missing from the legend contribute nothing.
    pub fn modifier_bitset(&self, modifiers: &[Modifier]) -> u32 {
        modifiers
            .iter()
            .filter_map(|modifier| self.modifier_index.get(modifier.as_str()))
            .filter(|index| **index < u32::BITS)
            .fold(0u32, |bits, index| bits | (1 << *index))
    }

    pub fn to_lsp(&self) -> SemanticTokensLegend {
        SemanticTokensLegend {
            token_types: self
                .categories
                .iter()
                .copied()
                .map(SemanticTokenType::new)
                .collect(),
            token_modifiers: self
                .modifiers
                .iter()
                .copied()
                .map(SemanticTokenModifier::new)
                .collect(),
        }
    }
}

impl Default for Legend {
    fn default() -> Self {
        Self::standard()
    }
}

fn first_seen_index(names: &[&'static str]) -> HashMap<&'static str, u32> {
    let mut index = HashMap::with_capacity(names.len());
    for (position, name) in names.iter().enumerate() {
        index.entry(*name).or_insert(position as u32);
    }
    index
}
