//! Typedef and struct-name registry
//!
//! One registry belongs to one parser instance and only ever grows: a name
//! registered while parsing one file stays visible for every later file.

use codecatalog_api::StructMember;
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What the registry knows about a type name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedefEntry {
    /// Struct tag the name refers to, when known
    pub struct_tag: Option<String>,
    /// Name aliases a pointer to the struct (`*PName`)
    pub is_pointer: bool,
    pub members: Vec<StructMember>,
    pub documentation: Option<String>,
}

impl TypedefEntry {
    pub fn alias_of(tag: impl Into<String>, is_pointer: bool) -> Self {
        Self {
            struct_tag: Some(tag.into()),
            is_pointer,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeRegistry {
    entries: HashMap<String, TypedefEntry>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `name`. Returns true if the name was new.
    pub fn register(&mut self, name: impl Into<String>, entry: TypedefEntry) -> bool {
        let name = name.into();
        trace!("Registering type {name} -> {:?}", entry.struct_tag);
        self.entries.insert(name, entry).is_none()
    }

    /// Attach parsed members and documentation to an existing name
    pub fn set_members(
        &mut self,
        name: &str,
        members: Vec<StructMember>,
        documentation: Option<String>,
    ) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.members = members;
            entry.documentation = documentation;
        }
    }

    pub fn get(&self, name: &str) -> Option<&TypedefEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_reports_new_names() {
        let mut registry = TypeRegistry::new();
        assert!(registry.register("Node", TypedefEntry::alias_of("_Node", false)));
        assert!(!registry.register("Node", TypedefEntry::alias_of("_Node", false)));
        assert!(registry.register("PNode", TypedefEntry::alias_of("_Node", true)));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["Node", "PNode"]);
        assert!(registry.get("PNode").unwrap().is_pointer);
    }

    #[test]
    fn test_set_members_only_touches_known_names() {
        let mut registry = TypeRegistry::new();
        registry.register("cfg_t", TypedefEntry::default());
        registry.set_members(
            "cfg_t",
            vec![StructMember::new("count", "int")],
            Some("Config".to_string()),
        );
        registry.set_members("ghost", vec![StructMember::new("x", "int")], None);

        let entry = registry.get("cfg_t").unwrap();
        assert_eq!(entry.members.len(), 1);
        assert_eq!(entry.documentation.as_deref(), Some("Config"));
        assert!(!registry.contains("ghost"));
    }
}
