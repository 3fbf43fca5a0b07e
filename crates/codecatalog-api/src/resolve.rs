//! Cross-file call resolution.
//!
//! Extraction leaves every call's component and return type as
//! [`Resolution::Unresolved`]. Once all files of a run are extracted, an
//! [`EntityTable`] over the complete entity list fills them in from the
//! function definitions it knows about.

use crate::entities::{CodeEntity, Resolution};
use log::{debug, info};
use std::collections::HashMap;

/// Counts from one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    pub resolved: usize,
    pub unresolved: usize,
}

#[derive(Debug, Clone)]
struct Definition {
    component: String,
    return_type: Option<String>,
}

/// The complete entity list of a run, indexed by function name
#[derive(Debug, Default)]
pub struct EntityTable {
    entities: Vec<CodeEntity>,
    functions: HashMap<String, Definition>,
}

impl EntityTable {
    pub fn new(entities: Vec<CodeEntity>) -> Self {
        let mut table = Self::default();
        for entity in entities {
            table.insert(entity);
        }
        table
    }

    /// Add an entity; the first function definition of a name wins.
    pub fn insert(&mut self, entity: CodeEntity) {
        if entity.is_function() && !self.functions.contains_key(&entity.name) {
            self.functions.insert(
                entity.name.clone(),
                Definition {
                    component: entity.component.clone(),
                    return_type: entity.return_type().map(str::to_string),
                },
            );
        }
        self.entities.push(entity);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&CodeEntity> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn entities(&self) -> &[CodeEntity] {
        &self.entities
    }

    pub fn into_entities(self) -> Vec<CodeEntity> {
        self.entities
    }

    /// Rewrite call placeholders from the definitions in the table.
    ///
    /// Callee names are looked up exactly as recorded, so qualified member
    /// calls (`ctx->run`) only resolve if something is defined under that
    /// name. Calls resolved by an earlier pass are left untouched.
    pub fn resolve_calls(&mut self) -> ResolutionStats {
        let mut stats = ResolutionStats::default();

        for entity in &mut self.entities {
            for call in &mut entity.function_calls {
                if call.resolved_component.is_resolved() {
                    stats.resolved += 1;
                    continue;
                }
                match self.functions.get(&call.name) {
                    Some(def) => {
                        call.resolved_component = Resolution::Resolved(def.component.clone());
                        if let Some(ret) = &def.return_type {
                            call.resolved_return_type = Resolution::Resolved(ret.clone());
                        }
                        stats.resolved += 1;
                    }
                    None => {
                        debug!("{} -> {} left unresolved", entity.name, call.name);
                        stats.unresolved += 1;
                    }
                }
            }
        }

        info!(
            "Resolved {} calls, {} unresolved",
            stats.resolved, stats.unresolved
        );
        stats
    }
}
