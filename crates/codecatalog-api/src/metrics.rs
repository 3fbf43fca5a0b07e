use serde::{Deserialize, Serialize};

/// Counts collected while extracting one or more files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Function definitions turned into entities
    pub functions_extracted: usize,

    /// Function candidates dropped (prototypes, unbalanced bodies, denied names)
    pub functions_skipped: usize,

    /// Struct definitions turned into entities
    pub structs_extracted: usize,

    /// Struct candidates dropped (anonymous, malformed)
    pub structs_skipped: usize,

    /// Member lines parsed into records
    pub members_parsed: usize,

    /// Non-empty body lines that did not parse as members
    pub members_skipped: usize,

    /// Aliases added to the type registry
    pub typedefs_registered: usize,

    /// Call edges recorded across all functions
    pub calls_recorded: usize,
}

impl ExtractionStats {
    /// Total entities produced
    pub fn entity_count(&self) -> usize {
        self.functions_extracted + self.structs_extracted
    }

    /// Total candidates dropped at any granularity
    pub fn skipped_count(&self) -> usize {
        self.functions_skipped + self.structs_skipped + self.members_skipped
    }

    /// Merge another stats object into this one
    pub fn merge(&mut self, other: &ExtractionStats) {
        self.functions_extracted += other.functions_extracted;
        self.functions_skipped += other.functions_skipped;
        self.structs_extracted += other.structs_extracted;
        self.structs_skipped += other.structs_skipped;
        self.members_parsed += other.members_parsed;
        self.members_skipped += other.members_skipped;
        self.typedefs_registered += other.typedefs_registered;
        self.calls_recorded += other.calls_recorded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge() {
        let mut total = ExtractionStats {
            functions_extracted: 2,
            members_skipped: 1,
            ..Default::default()
        };
        let other = ExtractionStats {
            functions_extracted: 1,
            structs_extracted: 3,
            functions_skipped: 4,
            ..Default::default()
        };
        total.merge(&other);
        assert_eq!(total.entity_count(), 6);
        assert_eq!(total.skipped_count(), 5);
    }
}
