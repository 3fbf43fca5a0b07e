//! Entity assembly for one C file
//!
//! Runs the passes in order: typedef pre-scan, struct definitions (which
//! feed the registry), then function definitions with their call graphs.
//! Output lists functions first, then structs, each in discovery order.

use codecatalog_api::{
    CodeEntity, EntityKind, ExtractionStats, FileExtraction, Metadata, ParserConfig, SkipReason,
    StructMember,
};
use log::{debug, info};
use regex::Regex;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

use crate::calls::analyze_calls;
use crate::functions::{find_functions, FunctionSpan};
use crate::members::parse_members;
use crate::registry::{TypeRegistry, TypedefEntry};
use crate::structs::{find_structs, find_typedef_aliases, StructSpan};
use crate::text::LineIndex;
use crate::tokenizer::{tokenize, TokenKind};

static RE_INCLUDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^\s*#\s*include\s*[<"]([^>"]+)[>"]"#).unwrap());

/// Header names from `#include` lines, in source order
pub fn find_includes(source: &str) -> Vec<String> {
    RE_INCLUDE
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Extract every function and struct entity from one file.
///
/// Names registered along the way stay in `registry` for later files.
pub fn extract(
    source: &str,
    file_path: &Path,
    component: &str,
    config: &ParserConfig,
    registry: &mut TypeRegistry,
) -> FileExtraction {
    let mut extractor = Extractor {
        source,
        file_path,
        component,
        config,
        registry,
        includes: find_includes(source),
        index: LineIndex::new(source),
        stats: ExtractionStats::default(),
    };

    extractor.register_typedef_aliases();
    let structs = extractor.extract_structs();
    let mut entities = extractor.extract_functions();
    entities.extend(structs);

    info!(
        "{}: {} functions, {} structs, {} skipped",
        file_path.display(),
        extractor.stats.functions_extracted,
        extractor.stats.structs_extracted,
        extractor.stats.skipped_count()
    );

    let mut extraction = FileExtraction::empty(file_path);
    extraction.entities = entities;
    extraction.stats = extractor.stats;
    extraction
}

struct Extractor<'a> {
    source: &'a str,
    file_path: &'a Path,
    component: &'a str,
    config: &'a ParserConfig,
    registry: &'a mut TypeRegistry,
    includes: Vec<String>,
    index: LineIndex<'a>,
    stats: ExtractionStats,
}

impl Extractor<'_> {
    fn register_typedef_aliases(&mut self) {
        for alias in find_typedef_aliases(self.source) {
            if self
                .registry
                .register(alias.name, TypedefEntry::alias_of(&alias.tag, false))
            {
                self.stats.typedefs_registered += 1;
            }
            if let Some(pointer_name) = alias.pointer_name {
                if self
                    .registry
                    .register(pointer_name, TypedefEntry::alias_of(&alias.tag, true))
                {
                    self.stats.typedefs_registered += 1;
                }
            }
        }
    }

    fn extract_structs(&mut self) -> Vec<CodeEntity> {
        let mut entities = Vec::new();
        for candidate in find_structs(self.source) {
            let built = candidate
                .map_err(|skipped| skipped.reason)
                .and_then(|span| self.build_struct(&span));
            match built {
                Ok(entity) => {
                    debug!("Extracted struct {}", entity.name);
                    self.stats.structs_extracted += 1;
                    entities.push(entity);
                }
                Err(reason) => {
                    debug!("Struct skipped in {}: {reason}", self.file_path.display());
                    self.stats.structs_skipped += 1;
                }
            }
        }
        entities
    }

    fn extract_functions(&mut self) -> Vec<CodeEntity> {
        let mut entities = Vec::new();
        for candidate in find_functions(self.source) {
            let built = candidate
                .map_err(|skipped| skipped.reason)
                .and_then(|span| self.build_function(&span));
            match built {
                Ok(entity) => {
                    debug!(
                        "Extracted function {} with {} calls",
                        entity.name,
                        entity.function_calls.len()
                    );
                    self.stats.functions_extracted += 1;
                    entities.push(entity);
                }
                Err(reason) => {
                    debug!("Function skipped in {}: {reason}", self.file_path.display());
                    self.stats.functions_skipped += 1;
                }
            }
        }
        entities
    }

    fn build_struct(&mut self, span: &StructSpan) -> Result<CodeEntity, SkipReason> {
        // Registered before member parsing so self-references classify
        let entry = TypedefEntry {
            struct_tag: span.tag.clone(),
            documentation: span.documentation.clone(),
            ..Default::default()
        };
        if self.registry.register(span.name.as_str(), entry) {
            self.stats.typedefs_registered += 1;
        }
        if let Some(pointer_alias) = &span.pointer_alias {
            let tag = span.tag.as_deref().unwrap_or(&span.name);
            if self
                .registry
                .register(pointer_alias.as_str(), TypedefEntry::alias_of(tag, true))
            {
                self.stats.typedefs_registered += 1;
            }
        }

        let mut members = Vec::new();
        for result in parse_members(span.body(self.source)) {
            match result {
                Ok(member) => members.push(member),
                Err(reason) => {
                    debug!("{}: {reason}", span.name);
                    self.stats.members_skipped += 1;
                }
            }
        }
        self.stats.members_parsed += members.len();
        self.registry
            .set_members(&span.name, members.clone(), span.documentation.clone());

        let referenced = self.referenced_by_members(&members);
        let (first, last) = self.line_range(span.start, span.end);

        let mut metadata = Metadata::new();
        metadata.insert("struct_name".into(), json!(span.tag));
        metadata.insert("keyword".into(), json!(span.keyword));
        metadata.insert("is_typedef".into(), json!(span.is_typedef));
        metadata.insert("pointer_alias".into(), json!(span.pointer_alias));
        metadata.insert("documentation".into(), json!(span.documentation));
        metadata.insert("line_number".into(), json!(first));
        metadata.insert("end_line".into(), json!(last));
        metadata.insert("member_count".into(), json!(members.len()));
        metadata.insert(
            "has_arrays".into(),
            json!(members.iter().any(StructMember::is_array)),
        );
        metadata.insert(
            "has_pointers".into(),
            json!(members.iter().any(|m| m.is_pointer)),
        );
        metadata.insert(
            "has_bit_fields".into(),
            json!(members.iter().any(StructMember::is_bit_field)),
        );
        metadata.insert("has_struct_pack".into(), json!(span.is_packed));
        metadata.insert("referenced_structs".into(), serde_json::to_value(&referenced)?);
        metadata.insert("members".into(), serde_json::to_value(&members)?);
        self.insert_context(&mut metadata, first, last);

        Ok(CodeEntity::new(
            span.name.as_str(),
            EntityKind::Struct,
            span.content(self.source),
            self.file_path,
            self.component,
        )
        .with_structs_used(referenced)
        .with_includes(self.includes.clone())
        .with_metadata(metadata))
    }

    fn build_function(&mut self, span: &FunctionSpan) -> Result<CodeEntity, SkipReason> {
        if self.config.skip_ignored_definitions && self.config.is_ignored(&span.name) {
            return Err(SkipReason::DeniedName(span.name.clone()));
        }

        let content = span.content(self.source);
        let calls = analyze_calls(content, span.body_open - span.start, self.config);
        self.stats.calls_recorded += calls.len();

        let (first, last) = self.line_range(span.start, span.end);
        let mut metadata = Metadata::new();
        metadata.insert("return_type".into(), json!(span.return_type(self.source)));
        metadata.insert(
            "parameters".into(),
            serde_json::to_value(span.parameters(self.source))?,
        );
        metadata.insert("signature".into(), json!(span.signature(self.source)));
        metadata.insert("line_number".into(), json!(first));
        metadata.insert("end_line".into(), json!(last));
        self.insert_context(&mut metadata, first, last);

        Ok(CodeEntity::new(
            span.name.as_str(),
            EntityKind::Function,
            content,
            self.file_path,
            self.component,
        )
        .with_function_calls(calls)
        .with_structs_used(self.referenced_by_text(content))
        .with_includes(self.includes.clone())
        .with_metadata(metadata))
    }

    /// Member types written with `struct`/`union` or known to the registry
    fn referenced_by_members(&self, members: &[StructMember]) -> BTreeSet<String> {
        members
            .iter()
            .filter(|m| {
                matches!(m.type_keyword.as_deref(), Some("struct" | "union"))
                    || self.registry.contains(&m.type_name)
            })
            .map(|m| m.type_name.clone())
            .collect()
    }

    /// Names after `struct`/`union` plus any identifier the registry knows
    fn referenced_by_text(&self, text: &str) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let mut after_keyword = false;
        for token in tokenize(text) {
            if token.kind != TokenKind::Identifier {
                after_keyword = false;
                continue;
            }
            if after_keyword || self.registry.contains(token.text) {
                found.insert(token.text.to_string());
            }
            after_keyword = matches!(token.text, "struct" | "union");
        }
        found
    }

    fn line_range(&self, start: usize, end: usize) -> (usize, usize) {
        let first = self.index.line_of(start);
        let last = self.index.line_of(end.saturating_sub(1).max(start));
        (first, last)
    }

    fn insert_context(&self, metadata: &mut Metadata, first: usize, last: usize) {
        if !self.config.include_context {
            return;
        }
        let (before, after) = self.index.context(first, last, self.config.context_lines);
        metadata.insert("context_before".into(), Value::String(before));
        metadata.insert("context_after".into(), Value::String(after));
    }
}
