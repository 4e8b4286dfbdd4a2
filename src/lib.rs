//! simple-namespace - flag public C# types declared in flat namespaces
//!
//! A type declared in `namespace ConsoleApp.Sub { ... }` is reported; the
//! same type in `namespace ConsoleApp { namespace Sub { ... } }` or in a
//! single-segment namespace is not. The accompanying fix collapses the
//! flat declaration to its first segment.
//!
//! Pipeline: [`parsers::csharp`] builds a [`semantic::SourceModel`] per file,
//! [`detectors`] evaluate it and report [`models::Finding`]s, [`reporters`]
//! render them, and [`fixes`] rewrite a declaration on request.

pub mod cache;
pub mod cli;
pub mod config;
pub mod detectors;
pub mod fixes;
pub mod models;
pub mod parsers;
pub mod reporters;
pub mod semantic;
