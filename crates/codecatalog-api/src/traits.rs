use crate::{
    config::ParserConfig,
    entities::CodeEntity,
    errors::{ParserError, ParserResult},
    metrics::ExtractionStats,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Entities extracted from one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileExtraction {
    /// Path to the source file
    pub file_path: PathBuf,

    /// Functions in discovery order, then structs in discovery order
    pub entities: Vec<CodeEntity>,

    pub stats: ExtractionStats,

    /// Time taken to parse this file
    #[serde(with = "duration_serde")]
    pub parse_time: Duration,
}

// Helper module for serializing Duration
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis: u64 = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

impl FileExtraction {
    /// An extraction with no entities, used when a file is abandoned
    pub fn empty(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            entities: Vec::new(),
            stats: ExtractionStats::default(),
            parse_time: Duration::ZERO,
        }
    }

    pub fn functions(&self) -> impl Iterator<Item = &CodeEntity> {
        self.entities.iter().filter(|e| e.is_function())
    }

    pub fn structs(&self) -> impl Iterator<Item = &CodeEntity> {
        self.entities.iter().filter(|e| e.is_struct())
    }
}

/// Aggregate result of a multi-file run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectExtraction {
    /// Information about each successfully parsed file
    pub files: Vec<FileExtraction>,

    /// Files that were abandoned (path, error message)
    pub failed_files: Vec<(PathBuf, String)>,

    /// Stats summed over `files`
    pub stats: ExtractionStats,
}

impl ProjectExtraction {
    pub fn push(&mut self, file: FileExtraction) {
        self.stats.merge(&file.stats);
        self.files.push(file);
    }

    pub fn push_failure(&mut self, path: PathBuf, error: &ParserError) {
        warn!("Skipping {}: {error}", path.display());
        self.failed_files.push((path, error.to_string()));
    }

    /// Total number of files processed (success + failure)
    pub fn total_files(&self) -> usize {
        self.files.len() + self.failed_files.len()
    }

    /// Success rate (0.0 to 1.0)
    pub fn success_rate(&self) -> f64 {
        if self.total_files() == 0 {
            0.0
        } else {
            self.files.len() as f64 / self.total_files() as f64
        }
    }

    pub fn entities(&self) -> impl Iterator<Item = &CodeEntity> {
        self.files.iter().flat_map(|f| f.entities.iter())
    }

    pub fn into_entities(self) -> Vec<CodeEntity> {
        self.files.into_iter().flat_map(|f| f.entities).collect()
    }
}

/// Core trait for extractors that turn source text into entities
///
/// Implementations may keep state across files (a type registry, for
/// instance), so the parsing methods take `&mut self`. Use one instance
/// per thread for parallel runs.
pub trait EntityParser {
    /// Returns the language identifier (lowercase, e.g., "c")
    fn language(&self) -> &str;

    /// Returns supported file extensions (e.g., [".c", ".h"])
    fn file_extensions(&self) -> &[&str];

    /// Get parser configuration
    fn config(&self) -> &ParserConfig;

    /// Extract entities from in-memory source.
    ///
    /// Never fails: candidates that do not hold together are skipped and
    /// counted in the returned stats.
    fn parse_source(&mut self, source: &str, file_path: &Path, component: &str)
        -> FileExtraction;

    /// Read a file with one buffered read and extract it.
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    fn parse_file(&mut self, path: &Path, component: &str) -> ParserResult<FileExtraction> {
        let metadata = fs::metadata(path).map_err(|e| ParserError::IoError(path.to_path_buf(), e))?;
        let max = self.config().max_file_size;
        if metadata.len() > max as u64 {
            return Err(ParserError::FileTooLarge(path.to_path_buf(), max));
        }

        let bytes = fs::read(path).map_err(|e| ParserError::IoError(path.to_path_buf(), e))?;
        let source = String::from_utf8_lossy(&bytes);

        info!("Parsing {} as component '{component}'", path.display());
        let start = Instant::now();
        let mut extraction = self.parse_source(&source, path, component);
        extraction.parse_time = start.elapsed();
        Ok(extraction)
    }

    /// Like `parse_file`, but a failed file yields no entities.
    fn extract_file(&mut self, path: &Path, component: &str) -> Vec<CodeEntity> {
        match self.parse_file(path, component) {
            Ok(extraction) => extraction.entities,
            Err(e) => {
                warn!("No entities from {}: {e}", path.display());
                Vec::new()
            }
        }
    }

    /// Parse multiple files sequentially; failures are collected, never fatal
    fn parse_files(&mut self, files: &[(PathBuf, String)]) -> ProjectExtraction {
        let mut project = ProjectExtraction::default();

        for (path, component) in files {
            match self.parse_file(path, component) {
                Ok(file) => project.push(file),
                Err(e) => project.push_failure(path.clone(), &e),
            }
        }

        info!(
            "Parsed {} of {} files: {} entities",
            project.files.len(),
            project.total_files(),
            project.stats.entity_count()
        );
        project
    }

    /// Parse a directory recursively, labelling each file via `component_for`
    fn parse_directory(&mut self, dir: &Path) -> ParserResult<ProjectExtraction> {
        let files = self
            .discover_files(dir)?
            .into_iter()
            .map(|path| {
                let component = self.component_for(&path);
                (path, component)
            })
            .collect::<Vec<_>>();
        Ok(self.parse_files(&files))
    }

    /// Discover parseable files in a directory
    ///
    /// Default implementation walks the directory and filters by extension.
    fn discover_files(&self, dir: &Path) -> ParserResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        let extensions = self.file_extensions();

        fn walk_dir(
            dir: &Path,
            extensions: &[&str],
            files: &mut Vec<PathBuf>,
        ) -> Result<(), ParserError> {
            if !dir.is_dir() {
                return Ok(());
            }

            for entry in
                fs::read_dir(dir).map_err(|e| ParserError::IoError(dir.to_path_buf(), e))?
            {
                let entry = entry.map_err(|e| ParserError::IoError(dir.to_path_buf(), e))?;
                let path = entry.path();

                if path.is_dir() {
                    walk_dir(&path, extensions, files)?;
                } else if let Some(ext) = path.extension() {
                    let ext_str = format!(".{}", ext.to_string_lossy());
                    if extensions.contains(&ext_str.as_str()) {
                        files.push(path);
                    }
                }
            }

            Ok(())
        }

        walk_dir(dir, extensions, &mut files)?;
        files.sort();
        Ok(files)
    }

    /// Check if this parser can handle the given file
    fn can_parse(&self, path: &Path) -> bool {
        if let Some(ext) = path.extension() {
            let ext_str = format!(".{}", ext.to_string_lossy());
            self.file_extensions().contains(&ext_str.as_str())
        } else {
            false
        }
    }

    /// Component label for a discovered file.
    ///
    /// The first configured fragment found (case-insensitively) in a path
    /// component wins; otherwise the parent directory name is used.
    fn component_for(&self, path: &Path) -> String {
        component_from_path(path, &self.config().known_components)
    }
}

/// Derive a component label from a file path
pub fn component_from_path(path: &Path, known_components: &[String]) -> String {
    let parts: Vec<String> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    for part in &parts {
        let lowered = part.to_lowercase();
        if let Some(known) = known_components
            .iter()
            .find(|known| lowered.contains(&known.to_lowercase()))
        {
            return known.clone();
        }
    }

    if parts.len() > 1 {
        parts[parts.len() - 2].clone()
    } else {
        "Unknown".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_from_known_fragment() {
        let known = vec!["OneWifi".to_string(), "CcspPsm".to_string()];
        let path = Path::new("/src/rdkb-onewifi/source/core/wifi_ctrl.c");
        assert_eq!(component_from_path(path, &known), "OneWifi");
    }

    #[test]
    fn test_component_falls_back_to_parent_dir() {
        let path = Path::new("/src/utils/list.c");
        assert_eq!(component_from_path(path, &[]), "utils");
        assert_eq!(component_from_path(Path::new("list.c"), &[]), "Unknown");
    }

    #[test]
    fn test_project_success_rate() {
        let mut project = ProjectExtraction::default();
        assert_eq!(project.success_rate(), 0.0);
        project.push(FileExtraction::empty("a.c"));
        project.push_failure(
            PathBuf::from("b.c"),
            &ParserError::ParseError(PathBuf::from("b.c"), "boom".to_string()),
        );
        assert_eq!(project.total_files(), 2);
        assert_eq!(project.success_rate(), 0.5);
    }
}
