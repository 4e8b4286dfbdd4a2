//! Source parsers using tree-sitter
//!
//! Only C# is analyzed. The parser turns a file into a
//! [`CompilationModel`](crate::semantic::CompilationModel) for the rule, and
//! answers the syntax lookups the namespace fix needs.

pub mod csharp;

use crate::semantic::{Location, TextSpan};
use std::path::Path;
use tree_sitter::Node;

/// File extensions handled by the analyzer
pub const SUPPORTED_EXTENSIONS: &[&str] = &["cs"];

/// Whether a path looks like C# source
pub fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

/// Byte span of a node
pub(crate) fn node_span(node: &Node) -> TextSpan {
    TextSpan::new(node.start_byte(), node.end_byte())
}

/// File location of a node, with 1-based line and column
pub(crate) fn node_location(node: &Node, path: &Path) -> Location {
    let start = node.start_position();
    Location {
        file: path.to_path_buf(),
        span: node_span(node),
        line: start.row as u32 + 1,
        column: start.column as u32 + 1,
    }
}
