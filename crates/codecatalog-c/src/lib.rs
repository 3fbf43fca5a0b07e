//! # codecatalog-c
//!
//! Heuristic C extractor for CodeCatalog - turns raw C source into function
//! and struct entities with per-function call graphs.
//!
//! ## Features
//!
//! - Function definitions found by line-anchored signatures and brace depth
//! - Struct, union and typedef definitions with parsed members
//! - A typedef registry that carries type names from one file to the next
//! - Outgoing calls per function, including `ctx->method(...)` forms
//! - Best-effort throughout: a candidate that does not hold together is
//!   skipped and counted, never fatal to the file
//!
//! No preprocessing, macro expansion or type checking is performed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use codecatalog_c::{CParser, EntityParser};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut parser = CParser::new();
//!
//! let extraction = parser.parse_file(Path::new("wifi/radio.c"), "wifi")?;
//! for function in extraction.functions() {
//!     println!("{} makes {} calls", function.name, function.function_calls.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## In-memory sources
//!
//! ```rust
//! use codecatalog_c::{CParser, EntityParser};
//! use std::path::Path;
//!
//! let mut parser = CParser::new();
//! let source = "static int foo(int a) { return bar(a); }";
//! let extraction = parser.parse_source(source, Path::new("foo.c"), "core");
//!
//! assert_eq!(extraction.entities[0].function_calls[0].name, "bar");
//! ```

pub mod calls;
pub mod extractor;
pub mod functions;
pub mod members;
mod parser_impl;
pub mod registry;
pub mod structs;
pub mod text;
pub mod tokenizer;

// Re-export api types for convenience
pub use codecatalog_api::{
    CodeEntity, EntityKind, EntityParser, ExtractionStats, FileExtraction, FunctionCall,
    ParserConfig, ParserError, ProjectExtraction, SkipReason, StructMember,
};

// Export the C parser implementation
pub use parser_impl::CParser;

// Export key types from submodules
pub use calls::{analyze_calls, CallSite};
pub use registry::{TypeRegistry, TypedefEntry};
pub use tokenizer::{tokenize, Token, TokenKind, Tokenizer};
