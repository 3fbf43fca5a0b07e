use serde::{Deserialize, Serialize};

/// Organizational call prefixes that mark a cross-component API call
pub const DEFAULT_API_PREFIXES: &[&str] = &[
    "CCSP_",
    "RDK_",
    "RBUS_",
    "TR181_",
    "CcspCommon_",
    "DM_",
    "PSM_",
];

/// Ubiquitous utility, library and tracing calls that never enter a call graph
pub const DEFAULT_IGNORED_CALLS: &[&str] = &[
    "printf",
    "scanf",
    "malloc",
    "free",
    "strlen",
    "strcpy",
    "strcmp_s",
    "ERR_CHK",
    "CcspTraceWarning",
    "ccspWifiDbgPrint",
    "strcmp",
    "memcpy",
    "memset",
    "fopen",
    "fclose",
    "AnscCopyString",
    "strcat",
    "AnscSizeOfString",
    "CcspTraceInfo",
    "main",
    "if",
    "for",
    "while",
    "switch",
    "wifi_util_dbg_print",
    "snprintf",
    "strncmp",
    "defined",
    "remove",
    "CcspTraceError",
    "UNREFERENCED_PARAMETER",
    "return",
    "strncat",
    "fprintf",
    "strncpy",
    "strtok",
    "wifi_util_error_print",
    "CcspWifiTrace",
];

/// Configuration for extractor behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Number of source lines captured before and after each entity
    pub context_lines: usize,

    /// Capture the surrounding-lines window at all
    pub include_context: bool,

    /// Callee name prefixes that set `is_api`
    pub api_prefixes: Vec<String>,

    /// Callee names dropped from every call graph
    pub ignored_calls: Vec<String>,

    /// Also drop function definitions whose name is in `ignored_calls`
    pub skip_ignored_definitions: bool,

    /// Maximum file size to parse (in bytes)
    /// Files larger than this will be skipped
    pub max_file_size: usize,

    /// Enable parallel parsing (for `parse_files`)
    pub parallel: bool,

    /// Path fragments recognised as component labels during discovery
    pub known_components: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            context_lines: 40,
            include_context: true,
            api_prefixes: DEFAULT_API_PREFIXES.iter().map(|s| s.to_string()).collect(),
            ignored_calls: DEFAULT_IGNORED_CALLS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            skip_ignored_definitions: true,
            max_file_size: 10 * 1024 * 1024, // 10 MB
            parallel: false,
            known_components: Vec::new(),
        }
    }
}

impl ParserConfig {
    /// Create config for fast parsing (no context windows)
    pub fn fast() -> Self {
        Self {
            include_context: false,
            context_lines: 0,
            ..Default::default()
        }
    }

    /// Enable parallel parsing
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set maximum file size
    pub fn with_max_file_size(mut self, size: usize) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set the context window size
    pub fn with_context_lines(mut self, lines: usize) -> Self {
        self.context_lines = lines;
        self
    }

    /// Replace the API prefix list
    pub fn with_api_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.api_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Add names to the deny-list
    pub fn with_ignored_calls<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_calls.extend(names.into_iter().map(Into::into));
        self
    }

    /// Set the component fragments used by directory discovery
    pub fn with_known_components<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_components = components.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a callee name follows an API naming convention
    pub fn is_api_call(&self, name: &str) -> bool {
        self.api_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
    }

    /// Whether a name is on the deny-list
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored_calls.iter().any(|n| n == name)
    }
}
