use super::call::FunctionCall;
use super::member::StructMember;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

/// Open map of structural facts attached to an entity
pub type Metadata = BTreeMap<String, Value>;

/// What kind of definition an entity was extracted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Function,
    Struct,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Function => f.write_str("function"),
            EntityKind::Struct => f.write_str("struct"),
        }
    }
}

/// An extracted function or struct definition.
///
/// Identity is the content fingerprint: two entities with byte-identical
/// source text are equal and hash equal regardless of file or component.
/// The content and its fingerprint are fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "EntityRecord")]
pub struct CodeEntity {
    pub name: String,

    pub kind: EntityKind,

    content: String,

    pub file_path: PathBuf,

    /// Caller-supplied organizational label
    pub component: String,

    /// Filled in later by a description-generation step
    pub description: String,

    /// Outgoing calls in first-occurrence order (functions only)
    pub function_calls: Vec<FunctionCall>,

    pub structs_used: BTreeSet<String>,

    pub api_calls: BTreeSet<String>,

    /// Headers included by the file the entity came from
    pub includes: Vec<String>,

    pub metadata: Metadata,

    fingerprint: String,
}

/// Wire shape accepted on deserialization; any stored fingerprint is ignored.
#[derive(Deserialize)]
struct EntityRecord {
    name: String,
    kind: EntityKind,
    content: String,
    file_path: PathBuf,
    component: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    function_calls: Vec<FunctionCall>,
    #[serde(default)]
    structs_used: BTreeSet<String>,
    #[serde(default)]
    api_calls: BTreeSet<String>,
    #[serde(default)]
    includes: Vec<String>,
    #[serde(default)]
    metadata: Metadata,
}

impl From<EntityRecord> for CodeEntity {
    fn from(record: EntityRecord) -> Self {
        let mut entity = CodeEntity::new(
            record.name,
            record.kind,
            record.content,
            record.file_path,
            record.component,
        );
        entity.description = record.description;
        entity.function_calls = record.function_calls;
        entity.structs_used = record.structs_used;
        entity.api_calls = record.api_calls;
        entity.includes = record.includes;
        entity.metadata = record.metadata;
        entity
    }
}

/// Hex SHA-256 of the verbatim content
pub fn fingerprint_of(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    format!("{digest:x}")
}

impl CodeEntity {
    pub fn new(
        name: impl Into<String>,
        kind: EntityKind,
        content: impl Into<String>,
        file_path: impl Into<PathBuf>,
        component: impl Into<String>,
    ) -> Self {
        let content = content.into();
        let fingerprint = fingerprint_of(&content);
        Self {
            name: name.into(),
            kind,
            content,
            file_path: file_path.into(),
            component: component.into(),
            description: String::new(),
            function_calls: Vec::new(),
            structs_used: BTreeSet::new(),
            api_calls: BTreeSet::new(),
            includes: Vec::new(),
            metadata: Metadata::new(),
            fingerprint,
        }
    }

    /// Set the call list; API calls are collected from it.
    pub fn with_function_calls(mut self, calls: Vec<FunctionCall>) -> Self {
        self.api_calls = calls
            .iter()
            .filter(|call| call.is_api)
            .map(|call| call.name.clone())
            .collect();
        self.function_calls = calls;
        self
    }

    pub fn with_structs_used(mut self, structs: BTreeSet<String>) -> Self {
        self.structs_used = structs;
        self
    }

    pub fn with_includes(mut self, includes: Vec<String>) -> Self {
        self.includes = includes;
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// The verbatim source span
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn is_function(&self) -> bool {
        self.kind == EntityKind::Function
    }

    pub fn is_struct(&self) -> bool {
        self.kind == EntityKind::Struct
    }

    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    pub fn metadata_usize(&self, key: &str) -> Option<usize> {
        self.metadata
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
    }

    pub fn metadata_bool(&self, key: &str) -> Option<bool> {
        self.metadata.get(key).and_then(Value::as_bool)
    }

    /// 1-based first and last line of the entity in its file
    pub fn line_range(&self) -> Option<(usize, usize)> {
        Some((
            self.metadata_usize("line_number")?,
            self.metadata_usize("end_line")?,
        ))
    }

    /// Return type recorded for a function entity
    pub fn return_type(&self) -> Option<&str> {
        self.metadata_str("return_type")
    }

    /// Parameter texts recorded for a function entity
    pub fn parameters(&self) -> Vec<String> {
        self.metadata
            .get("parameters")
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default()
    }

    /// Members recorded for a struct entity
    pub fn members(&self) -> Vec<StructMember> {
        self.metadata
            .get("members")
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default()
    }

    /// Plain-text rendering handed to an embedding step
    pub fn to_embedding_text(&self) -> String {
        let calls = self
            .function_calls
            .iter()
            .map(|call| {
                format!(
                    "{} ({}) -> {}",
                    call.name, call.resolved_component, call.resolved_return_type
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        let structs = self.structs_used.iter().cloned().collect::<Vec<_>>();
        let apis = self.api_calls.iter().cloned().collect::<Vec<_>>();

        [
            format!("Name: {}", self.name),
            format!("Type: {}", self.kind),
            format!("Component: {}", self.component),
            format!("Description: {}", self.description),
            format!("Function Calls: {calls}"),
            format!("Structs Used: {}", structs.join(", ")),
            format!("API Calls: {}", apis.join(", ")),
            "Context:".to_string(),
            self.content.clone(),
        ]
        .join("\n")
    }
}

impl PartialEq for CodeEntity {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
    }
}

impl Eq for CodeEntity {}

impl Hash for CodeEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fingerprint.hash(state);
    }
}
