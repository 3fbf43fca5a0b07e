use serde::{Deserialize, Serialize};
use std::fmt;

/// A cross-file reference that extraction leaves open.
///
/// Extraction always emits `Unresolved`; only the resolution pass over a
/// complete entity table (see [`crate::EntityTable`]) writes `Resolved`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    #[default]
    Unresolved,
    Resolved(String),
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    /// The resolved value, if any
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Resolution::Resolved(value) => Some(value),
            Resolution::Unresolved => None,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Resolved(value) => f.write_str(value),
            Resolution::Unresolved => f.write_str("Unknown"),
        }
    }
}

/// An outgoing call edge found inside a function body
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Callee name, qualified as `receiver->name` or `receiver.name` for member calls
    pub name: String,

    /// Component of the callee's definition
    pub resolved_component: Resolution,

    /// Argument text, split on top-level commas
    pub parameters: Vec<String>,

    /// Return type of the callee's definition
    pub resolved_return_type: Resolution,

    /// Callee follows an organizational API prefix
    pub is_api: bool,

    /// Line of the call, 1-based, relative to the start of the caller's content
    pub line_number: usize,

    /// Trimmed source line containing the call
    pub context: Option<String>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, line_number: usize) -> Self {
        Self {
            name: name.into(),
            resolved_component: Resolution::Unresolved,
            parameters: Vec::new(),
            resolved_return_type: Resolution::Unresolved,
            is_api: false,
            line_number,
            context: None,
        }
    }

    pub fn with_parameters(mut self, params: Vec<String>) -> Self {
        self.parameters = params;
        self
    }

    pub fn api(mut self, is_api: bool) -> Self {
        self.is_api = is_api;
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// The member part of a qualified name (`ctx->run` gives `run`)
    pub fn base_name(&self) -> &str {
        let after_arrow = self.name.rsplit("->").next().unwrap_or(&self.name);
        after_arrow.rsplit('.').next().unwrap_or(after_arrow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_call_is_unresolved() {
        let call = FunctionCall::new("bar", 3);
        assert_eq!(call.resolved_component, Resolution::Unresolved);
        assert_eq!(call.resolved_return_type, Resolution::Unresolved);
        assert_eq!(call.resolved_component.to_string(), "Unknown");
        assert!(!call.is_api);
    }

    #[test]
    fn test_base_name() {
        assert_eq!(FunctionCall::new("ctx->doInit", 1).base_name(), "doInit");
        assert_eq!(FunctionCall::new("obj.run", 1).base_name(), "run");
        assert_eq!(FunctionCall::new("plain", 1).base_name(), "plain");
    }

    #[test]
    fn test_resolution_serialization() {
        let json = serde_json::to_string(&Resolution::Resolved("wifi".into())).unwrap();
        assert_eq!(json, r#"{"resolved":"wifi"}"#);
        let json = serde_json::to_string(&Resolution::Unresolved).unwrap();
        assert_eq!(json, r#""unresolved""#);
    }
}
