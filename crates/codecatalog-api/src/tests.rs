//! Tests for the default `EntityParser` entry points

use crate::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Emits one function entity per non-empty line
struct LineParser {
    config: ParserConfig,
}

impl EntityParser for LineParser {
    fn language(&self) -> &str {
        "lines"
    }

    fn file_extensions(&self) -> &[&str] {
        &[".c", ".h"]
    }

    fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn parse_source(&mut self, source: &str, file_path: &Path, component: &str) -> FileExtraction {
        let mut extraction = FileExtraction::empty(file_path);
        for line in source.lines().filter(|l| !l.trim().is_empty()) {
            extraction.entities.push(CodeEntity::new(
                line.trim(),
                EntityKind::Function,
                line,
                file_path,
                component,
            ));
            extraction.stats.functions_extracted += 1;
        }
        extraction
    }
}

fn parser() -> LineParser {
    LineParser {
        config: ParserConfig::default(),
    }
}

#[test]
fn test_parse_file_reads_and_labels() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.c");
    fs::write(&path, "one\n\ntwo\n").unwrap();

    let extraction = parser().parse_file(&path, "core").unwrap();
    assert_eq!(extraction.entities.len(), 2);
    assert_eq!(extraction.entities[0].component, "core");
    assert_eq!(extraction.entities[0].file_path, path);
}

#[test]
fn test_parse_file_tolerates_invalid_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latin1.c");
    fs::write(&path, b"caf\xe9\n").unwrap();

    let extraction = parser().parse_file(&path, "x").unwrap();
    assert_eq!(extraction.entities.len(), 1);
    assert!(extraction.entities[0].content().starts_with("caf"));
}

#[test]
fn test_missing_file_yields_no_entities() {
    let missing = Path::new("/definitely/not/here.c");
    let mut parser = parser();
    assert!(matches!(
        parser.parse_file(missing, "x"),
        Err(ParserError::IoError(..))
    ));
    assert!(parser.extract_file(missing, "x").is_empty());
}

#[test]
fn test_oversized_file_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.c");
    fs::write(&path, "x".repeat(64)).unwrap();

    let mut parser = LineParser {
        config: ParserConfig::default().with_max_file_size(16),
    };
    assert!(matches!(
        parser.parse_file(&path, "x"),
        Err(ParserError::FileTooLarge(_, 16))
    ));
}

#[test]
fn test_parse_files_collects_failures() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.c");
    fs::write(&good, "a\nb\n").unwrap();
    let files = vec![
        (good, "app".to_string()),
        (PathBuf::from("/nope/missing.c"), "app".to_string()),
    ];

    let project = parser().parse_files(&files);
    assert_eq!(project.files.len(), 1);
    assert_eq!(project.failed_files.len(), 1);
    assert_eq!(project.stats.functions_extracted, 2);
    assert_eq!(project.into_entities().len(), 2);
}

#[test]
fn test_parse_directory_discovers_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("wifi");
    fs::create_dir(&nested).unwrap();
    fs::write(nested.join("a.c"), "x\n").unwrap();
    fs::write(nested.join("b.h"), "y\n").unwrap();
    fs::write(nested.join("notes.txt"), "z\n").unwrap();

    let mut parser = parser();
    let found = parser.discover_files(dir.path()).unwrap();
    assert_eq!(found.len(), 2);
    assert!(parser.can_parse(Path::new("x.h")));
    assert!(!parser.can_parse(Path::new("x.txt")));

    let project = parser.parse_directory(dir.path()).unwrap();
    assert_eq!(project.files.len(), 2);
    assert!(project.entities().all(|e| e.component == "wifi"));
}
