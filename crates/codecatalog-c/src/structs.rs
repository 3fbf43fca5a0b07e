//! Struct and union definition boundaries
//!
//! A definition is `[typedef] struct|union [TAG] { ... } [marker] [ALIAS[, *PALIAS]];`.
//! The head and tail are matched with patterns; the body in between is found
//! by depth counting, so any level of nested braces is accepted.

use codecatalog_api::SkipReason;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

use crate::text::find_matching;

static RE_STRUCT_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(typedef\s+)?(struct|union)\b\s*(?:([A-Za-z_]\w*)\s*)?\{").unwrap()
});

/// What may follow the closing brace: packing markers around an optional
/// alias and pointer alias, then `;`
static RE_STRUCT_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(_struct_pack_|__attribute__\s*\(\(.*?\)\))?\s*([A-Za-z_]\w*)?\s*(?:,\s*\*\s*([A-Za-z_]\w*)\s*)?(_struct_pack_|__attribute__\s*\(\(.*?\)\))?\s*;",
    )
    .unwrap()
});

/// `typedef struct TAG Name;` and `typedef struct TAG Name, *PName;`
static RE_TYPEDEF_ALIAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\btypedef\s+(?:struct|union)\s+([A-Za-z_]\w*)\s+([A-Za-z_]\w*)\s*(?:,\s*\*\s*([A-Za-z_]\w*)\s*)?;",
    )
    .unwrap()
});

/// An accepted struct or union definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructSpan {
    /// Alias if present, else tag
    pub name: String,
    pub tag: Option<String>,
    pub alias: Option<String>,
    /// `PName` in `} Name, *PName;`
    pub pointer_alias: Option<String>,
    /// `struct` or `union`
    pub keyword: String,
    pub is_typedef: bool,
    pub is_packed: bool,
    pub documentation: Option<String>,
    pub start: usize,
    pub body_open: usize,
    pub body_close: usize,
    /// One past the terminating `;`
    pub end: usize,
}

impl StructSpan {
    pub fn content<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// Text between the outer braces
    pub fn body<'a>(&self, source: &'a str) -> &'a str {
        &source[self.body_open + 1..self.body_close]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedStruct {
    pub offset: usize,
    pub reason: SkipReason,
}

/// A separate typedef naming an existing struct tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedefAlias {
    pub tag: String,
    pub name: String,
    pub pointer_name: Option<String>,
}

/// Every struct/union definition candidate in `source`, in order
pub fn find_structs(source: &str) -> Vec<Result<StructSpan, SkippedStruct>> {
    let mut results = Vec::new();
    let mut pos = 0;

    while let Some(caps) = RE_STRUCT_HEAD.captures_at(source, pos) {
        let Some(whole) = caps.get(0) else {
            break;
        };
        let body_open = whole.end() - 1;

        let Some(body_close) = find_matching(source, body_open, b'{', b'}') else {
            debug!("Skipping struct at {}: unbalanced braces", whole.start());
            results.push(Err(SkippedStruct {
                offset: whole.start(),
                reason: SkipReason::UnbalancedBraces,
            }));
            pos = whole.end();
            continue;
        };
        pos = body_close + 1;

        let Some(tail) = RE_STRUCT_TAIL.captures(&source[body_close + 1..]) else {
            debug!("Skipping struct at {}: malformed tail", whole.start());
            results.push(Err(SkippedStruct {
                offset: whole.start(),
                reason: SkipReason::MalformedTail,
            }));
            continue;
        };

        let tag = caps.get(3).map(|m| m.as_str().to_string());
        let alias = tail.get(2).map(|m| m.as_str().to_string());
        let Some(name) = alias.clone().or_else(|| tag.clone()) else {
            debug!("Skipping anonymous struct at {}", whole.start());
            results.push(Err(SkippedStruct {
                offset: whole.start(),
                reason: SkipReason::AnonymousStruct,
            }));
            continue;
        };

        let end = body_close + 1 + tail.get(0).map_or(0, |m| m.end());
        pos = end;
        results.push(Ok(StructSpan {
            name,
            tag,
            alias,
            pointer_alias: tail.get(3).map(|m| m.as_str().to_string()),
            keyword: caps.get(2).map_or("struct", |m| m.as_str()).to_string(),
            is_typedef: caps.get(1).is_some(),
            is_packed: tail.get(1).is_some() || tail.get(4).is_some(),
            documentation: preceding_doc_comment(source, whole.start()),
            start: whole.start(),
            body_open,
            body_close,
            end,
        }));
    }

    results
}

/// Separate `typedef struct TAG Name[, *PName];` declarations
pub fn find_typedef_aliases(source: &str) -> Vec<TypedefAlias> {
    RE_TYPEDEF_ALIAS
        .captures_iter(source)
        .filter_map(|caps| {
            Some(TypedefAlias {
                tag: caps.get(1)?.as_str().to_string(),
                name: caps.get(2)?.as_str().to_string(),
                pointer_name: caps.get(3).map(|m| m.as_str().to_string()),
            })
        })
        .collect()
}

/// The block comment ending right before `start`, with comment markers and
/// leading `*` gutters removed.
pub fn preceding_doc_comment(source: &str, start: usize) -> Option<String> {
    let before = source[..start].trim_end();
    let inner = before.strip_suffix("*/")?;
    let open = inner.rfind("/*")?;

    let text = inner[open + 2..]
        .lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted(source: &str) -> Vec<StructSpan> {
        find_structs(source).into_iter().filter_map(Result::ok).collect()
    }

    #[test]
    fn test_typedef_struct_with_alias() {
        let src = "typedef struct _Config {\n    int id;\n    char name[32];\n} Config;\n";
        let spans = accepted(src);
        assert_eq!(spans.len(), 1);
        let span = &spans[0];
        assert_eq!(span.name, "Config");
        assert_eq!(span.tag.as_deref(), Some("_Config"));
        assert!(span.is_typedef);
        assert_eq!(span.content(src), src.trim_end());
        assert_eq!(span.body(src), "\n    int id;\n    char name[32];\n");
    }

    #[test]
    fn test_plain_tagged_struct() {
        let spans = accepted("struct point { int x; int y; };");
        assert_eq!(spans[0].name, "point");
        assert!(spans[0].alias.is_none());
        assert!(!spans[0].is_typedef);
    }

    #[test]
    fn test_anonymous_struct_is_skipped() {
        let results = find_structs("struct { int x; };");
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].as_ref().unwrap_err().reason,
            SkipReason::AnonymousStruct
        );
    }

    #[test]
    fn test_nested_union_and_deep_nesting() {
        let src = "typedef struct {\n    union {\n        struct { int a; } inner;\n        int b;\n    } u;\n} Outer;\n";
        let spans = accepted(src);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].name, "Outer");
        assert!(spans[0].tag.is_none());
        assert!(spans[0].content(src).ends_with("} Outer;"));
    }

    #[test]
    fn test_packing_markers() {
        let spans = accepted("typedef struct { int a; } _struct_pack_ Packed;");
        assert_eq!(spans[0].name, "Packed");
        assert!(spans[0].is_packed);

        let spans = accepted("struct hdr { char c; } __attribute__((packed, aligned(4)));");
        assert_eq!(spans[0].name, "hdr");
        assert!(spans[0].is_packed);
    }

    #[test]
    fn test_pointer_alias_in_tail() {
        let spans = accepted("typedef struct _Item {\n    int v;\n} Item, *PItem;\n");
        assert_eq!(spans[0].name, "Item");
        assert_eq!(spans[0].pointer_alias.as_deref(), Some("PItem"));
        assert!(!spans[0].is_packed);
    }

    #[test]
    fn test_union_keyword() {
        let spans = accepted("typedef union { int i; float f; } Value;");
        assert_eq!(spans[0].keyword, "union");
        assert_eq!(spans[0].name, "Value");
    }

    #[test]
    fn test_variable_initializer_is_malformed() {
        let results = find_structs("struct s { int a; } v = { 1 };");
        assert_eq!(
            results[0].as_ref().unwrap_err().reason,
            SkipReason::MalformedTail
        );
    }

    #[test]
    fn test_struct_return_type_is_not_a_definition() {
        assert!(find_structs("struct node *make(void) { return 0; }").is_empty());
    }

    #[test]
    fn test_doc_comment() {
        let src = "int x;\n/**\n * Radio settings\n * per band\n */\ntypedef struct { int ch; } Radio;";
        let spans = accepted(src);
        assert_eq!(
            spans[0].documentation.as_deref(),
            Some("Radio settings\nper band")
        );

        let spans = accepted("/* old */ int y;\nstruct s { int a; };");
        assert!(spans[0].documentation.is_none());
    }

    #[test]
    fn test_typedef_aliases() {
        let src = "typedef struct _Node Node, *PNode;\ntypedef struct _Ctx Ctx;\n";
        let aliases = find_typedef_aliases(src);
        assert_eq!(aliases.len(), 2);
        assert_eq!(aliases[0].tag, "_Node");
        assert_eq!(aliases[0].name, "Node");
        assert_eq!(aliases[0].pointer_name.as_deref(), Some("PNode"));
        assert_eq!(aliases[1].name, "Ctx");
        assert!(aliases[1].pointer_name.is_none());
    }
}
