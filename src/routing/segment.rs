//! Segment tokenizer
//!
//! Templates and request paths go through the same grammar so that the
//! structural index of a dynamic segment in a template is the index of its
//! value in a matching path.

use regex::Regex;
use std::sync::LazyLock;

/// One token, optionally wrapped in `<` and `>`.
pub(crate) const TOKEN_EXPR: &str = r"<?[\w\-%.(),_~]+>?";

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TOKEN_EXPR).expect("token expression is valid"));

/// Kind of a template segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Literal text, matched case-sensitively
    Static,
    /// Placeholder, matches any single token
    Dynamic,
}

/// One component of a route template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Literal text for static segments, placeholder name for dynamic ones
    pub value: String,
}

impl Segment {
    pub fn is_dynamic(&self) -> bool {
        self.kind == SegmentKind::Dynamic
    }
}

/// Ordered segments describing the shape of one registered template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Contract {
    segments: Vec<Segment>,
}

impl Contract {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholder names, left to right.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments
            .iter()
            .filter(|s| s.is_dynamic())
            .map(|s| s.value.as_str())
    }

    /// Structural indexes of the dynamic segments, left to right.
    pub fn dynamic_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_dynamic())
            .map(|(i, _)| i)
    }

    pub fn arity(&self) -> usize {
        self.placeholders().count()
    }
}

/// Split a template or request path into raw tokens.
///
/// Separators and any character outside the token alphabet are dropped.
pub fn tokenize(s: &str) -> Vec<&str> {
    TOKEN.find_iter(s).map(|m| m.as_str()).collect()
}

/// Classify a raw token: `<name>` is dynamic, anything else is static.
pub fn classify(token: &str) -> Segment {
    match token.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        Some(name) if !name.is_empty() => Segment {
            kind: SegmentKind::Dynamic,
            value: name.to_string(),
        },
        _ => Segment {
            kind: SegmentKind::Static,
            value: token.to_string(),
        },
    }
}

/// Tokenize and classify a route template.
pub fn parse_template(template: &str) -> Contract {
    Contract::new(tokenize(template).into_iter().map(classify).collect())
}
