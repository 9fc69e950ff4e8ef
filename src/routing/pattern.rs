//! Pattern compiler
//!
//! Turns a contract into an anchored regex. Placeholder names are not part of
//! the pattern, so templates differing only in names compile identically.

use regex::Regex;

use super::segment::{Contract, SegmentKind, TOKEN_EXPR};
use crate::error::RoutingError;

/// Anchored matcher derived from a contract
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
}

impl CompiledPattern {
    /// Textual form, used as the registry key.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Whether the whole path matches, with an optional trailing `/`.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Build the pattern source for a contract.
pub fn pattern_source(contract: &Contract) -> String {
    let mut source = String::from(r"\A");
    for segment in contract.segments() {
        source.push('/');
        match segment.kind {
            SegmentKind::Static => source.push_str(&regex::escape(&segment.value)),
            SegmentKind::Dynamic => source.push_str(TOKEN_EXPR),
        }
    }
    source.push_str(r"/?\z");
    source
}

/// Compile a contract into an anchored matcher.
pub fn compile(template: &str, contract: &Contract) -> Result<CompiledPattern, RoutingError> {
    let source = pattern_source(contract);
    match Regex::new(&source) {
        Ok(regex) => Ok(CompiledPattern { regex }),
        Err(source_err) => Err(RoutingError::InvalidPattern {
            template: template.to_string(),
            pattern: source,
            source: source_err,
        }),
    }
}
