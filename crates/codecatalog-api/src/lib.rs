//! CodeCatalog API
//!
//! Shared records and seams for CodeCatalog extractors.
//!
//! This crate defines:
//!
//! - **CodeEntity**: an extracted function or struct, identified by a fingerprint of its exact text
//! - **FunctionCall / StructMember**: call-graph edges and struct member records
//! - **EntityParser trait**: the interface extractors implement, with file and directory entry points
//! - **Configuration**: API prefixes, deny-list, context window, size limits
//! - **Error handling**: file-level `ParserError` and per-candidate `SkipReason`
//! - **EntityTable**: the cross-file pass that resolves call placeholders
//!
//! # Example
//!
//! ```rust,ignore
//! use codecatalog_api::{EntityParser, EntityTable};
//! use std::path::Path;
//!
//! let mut parser = codecatalog_c::CParser::new();
//! let project = parser.parse_directory(Path::new("src"))?;
//!
//! let mut table = EntityTable::new(project.into_entities());
//! let stats = table.resolve_calls();
//! println!("{} calls resolved", stats.resolved);
//! ```

pub mod config;
pub mod entities;
pub mod errors;
pub mod metrics;
pub mod resolve;
pub mod traits;

// Re-export commonly used types
pub use config::ParserConfig;
pub use entities::{
    fingerprint_of, ArrayDimension, CodeEntity, EntityKind, FunctionCall, Metadata, Resolution,
    StructMember,
};
pub use errors::{ParserError, ParserResult, SkipReason};
pub use metrics::ExtractionStats;
pub use resolve::{EntityTable, ResolutionStats};
pub use traits::{component_from_path, EntityParser, FileExtraction, ProjectExtraction};

#[cfg(test)]
mod tests;
