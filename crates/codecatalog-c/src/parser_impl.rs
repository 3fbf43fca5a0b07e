//! Implementation of the EntityParser trait for C

use codecatalog_api::{
    EntityParser, FileExtraction, ParserConfig, ParserError, ProjectExtraction,
};
use log::info;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::extractor;
use crate::registry::TypeRegistry;

/// C entity parser.
///
/// Owns a [`TypeRegistry`] that grows across every file it parses, so a
/// typedef seen in a header parsed earlier classifies types in later files.
/// Not meant to be shared between threads; parallel runs use one parser per
/// worker.
#[derive(Debug, Clone, Default)]
pub struct CParser {
    config: ParserConfig,
    registry: TypeRegistry,
}

impl CParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            registry: TypeRegistry::new(),
        }
    }

    /// Type names collected so far
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> TypeRegistry {
        self.registry
    }

    /// Parse files in parallel using rayon.
    ///
    /// Each worker gets a fresh parser with this parser's config and an
    /// empty registry; worker registries are discarded afterwards.
    pub fn parse_files_parallel(&self, files: &[(PathBuf, String)]) -> ProjectExtraction {
        use rayon::prelude::*;

        let start = Instant::now();
        let results: Vec<(PathBuf, Result<FileExtraction, ParserError>)> = files
            .par_iter()
            .map_init(
                || CParser::with_config(self.config.clone()),
                |parser, (path, component)| (path.clone(), parser.parse_file(path, component)),
            )
            .collect();

        let mut project = ProjectExtraction::default();
        for (path, result) in results {
            match result {
                Ok(file) => project.push(file),
                Err(e) => project.push_failure(path, &e),
            }
        }

        info!(
            "Parsed {} of {} files in parallel in {:?}: {} entities",
            project.files.len(),
            project.total_files(),
            start.elapsed(),
            project.stats.entity_count()
        );
        project
    }

    fn parse_files_sequential(&mut self, files: &[(PathBuf, String)]) -> ProjectExtraction {
        let mut project = ProjectExtraction::default();
        for (path, component) in files {
            match self.parse_file(path, component) {
                Ok(file) => project.push(file),
                Err(e) => project.push_failure(path.clone(), &e),
            }
        }

        info!(
            "Parsed {} of {} files: {} entities, {} type names known",
            project.files.len(),
            project.total_files(),
            project.stats.entity_count(),
            self.registry.len()
        );
        project
    }
}

impl EntityParser for CParser {
    fn language(&self) -> &str {
        "c"
    }

    fn file_extensions(&self) -> &[&str] {
        &[".c", ".h", ".cc", ".cpp"]
    }

    fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn parse_source(&mut self, source: &str, file_path: &Path, component: &str) -> FileExtraction {
        let start = Instant::now();
        let mut extraction =
            extractor::extract(source, file_path, component, &self.config, &mut self.registry);
        extraction.parse_time = start.elapsed();
        extraction
    }

    fn parse_files(&mut self, files: &[(PathBuf, String)]) -> ProjectExtraction {
        if self.config.parallel {
            self.parse_files_parallel(files)
        } else {
            self.parse_files_sequential(files)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language() {
        let parser = CParser::new();
        assert_eq!(parser.language(), "c");
    }

    #[test]
    fn test_file_extensions() {
        let parser = CParser::new();
        assert_eq!(parser.file_extensions(), &[".c", ".h", ".cc", ".cpp"]);
    }

    #[test]
    fn test_can_parse() {
        let parser = CParser::new();
        assert!(parser.can_parse(Path::new("main.c")));
        assert!(parser.can_parse(Path::new("types.h")));
        assert!(!parser.can_parse(Path::new("main.rs")));
    }

    #[test]
    fn test_registry_persists_across_sources() {
        let mut parser = CParser::new();
        parser.parse_source(
            "typedef struct _Ctx Ctx, *PCtx;\n",
            Path::new("ctx.h"),
            "core",
        );
        let extraction = parser.parse_source(
            "int run(PCtx c) {\n    return step(c);\n}\n",
            Path::new("run.c"),
            "core",
        );
        assert!(parser.registry().contains("Ctx"));
        assert!(extraction.entities[0].structs_used.contains("PCtx"));
    }
}
