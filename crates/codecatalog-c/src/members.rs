//! Line-oriented struct member parsing
//!
//! Bodies are handled one line at a time. A line either matches the member
//! grammar or is skipped; nested struct openers, stray braces and
//! preprocessor lines fall in the second group and never abort the struct.

use codecatalog_api::{ArrayDimension, SkipReason, StructMember};
use log::trace;
use regex::Regex;
use std::sync::LazyLock;

/// `[struct|union|enum] type words  [*...] name [dims...] [: width] ;`
static RE_MEMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(struct|union|enum)\s+)?((?:[A-Za-z_]\w*\s+)*?[A-Za-z_]\w*)[\s*]+([A-Za-z_]\w*)((?:\s*\[[^\]]*\])*)(?:\s*:\s*(\d+))?\s*;$",
    )
    .unwrap()
});

static RE_DIMENSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]*)\]").unwrap());

/// Parse every line of a struct body, in order
pub fn parse_members(body: &str) -> Vec<Result<StructMember, SkipReason>> {
    strip_multiline_comments(body)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_member_line)
        .collect()
}

/// Parse one trimmed member line.
///
/// A trailing `/* ... */` or `// ...` comment becomes the documentation;
/// leading inline comments are dropped.
pub fn parse_member_line(line: &str) -> Result<StructMember, SkipReason> {
    let (declaration, documentation) = split_trailing_comment(line);
    let declaration = strip_leading_comments(declaration);

    let caps = RE_MEMBER
        .captures(declaration)
        .ok_or_else(|| SkipReason::MemberMismatch(line.to_string()))?;

    let type_name = caps.get(2).map_or("", |m| m.as_str().trim());
    let name = caps.get(3).map_or("", |m| m.as_str());
    let dimensions = caps
        .get(4)
        .map(|m| {
            RE_DIMENSION
                .captures_iter(m.as_str())
                .filter_map(|d| d.get(1))
                .map(|d| ArrayDimension::parse(d.as_str()))
                .collect()
        })
        .unwrap_or_default();

    let mut member = StructMember::new(name, type_name)
        .with_pointers(declaration.matches('*').count())
        .with_dimensions(dimensions)
        .with_raw(line);

    if let Some(keyword) = caps.get(1) {
        member = member.with_keyword(keyword.as_str());
    }
    if let Some(width) = caps.get(5) {
        let width = width
            .as_str()
            .parse::<u32>()
            .map_err(|_| SkipReason::MemberMismatch(line.to_string()))?;
        member = member.with_bit_width(width);
    }
    if let Some(doc) = documentation {
        member = member.with_doc(doc);
    }

    trace!("Member {} : {}", member.name, member.type_name);
    Ok(member)
}

/// Split `decl; /* doc */` or `decl; // doc` into its two halves
fn split_trailing_comment(line: &str) -> (&str, Option<String>) {
    let Some(semi) = line.find(';') else {
        return (line, None);
    };
    let (declaration, rest) = line.split_at(semi + 1);
    let rest = rest.trim();

    let doc = if let Some(inner) = rest.strip_prefix("/*") {
        inner.strip_suffix("*/").unwrap_or(inner)
    } else if let Some(inner) = rest.strip_prefix("//") {
        inner
    } else {
        return (line, None);
    };

    let doc = doc.trim_start_matches(['*', '/', '<', '!']).trim();
    (declaration.trim_end(), (!doc.is_empty()).then(|| doc.to_string()))
}

/// Drop block comments that span lines; single-line ones stay for
/// `parse_member_line` to classify.
fn strip_multiline_comments(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut rest = body;
    while let Some(open) = rest.find("/*") {
        let Some(close) = rest[open + 2..].find("*/").map(|i| open + 2 + i + 2) else {
            out.push_str(&rest[..open]);
            return out;
        };
        out.push_str(&rest[..open]);
        let comment = &rest[open..close];
        if comment.contains('\n') {
            out.push('\n');
        } else {
            out.push_str(comment);
        }
        rest = &rest[close..];
    }
    out.push_str(rest);
    out
}

fn strip_leading_comments(mut text: &str) -> &str {
    while let Some(rest) = text.strip_prefix("/*") {
        match rest.find("*/") {
            Some(end) => text = rest[end + 2..].trim_start(),
            None => return "",
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(line: &str) -> StructMember {
        parse_member_line(line).unwrap()
    }

    #[test]
    fn test_plain_member() {
        let m = member("uint32_t count;");
        assert_eq!(m.name, "count");
        assert_eq!(m.type_name, "uint32_t");
        assert!(!m.is_pointer);
        assert!(m.array_size().is_none());
        assert!(m.bit_width.is_none());
        assert_eq!(m.raw, "uint32_t count;");
    }

    #[test]
    fn test_array_dimensions() {
        let m = member("char name[32];");
        assert_eq!(m.array_size(), Some(&ArrayDimension::Fixed(32)));

        let m = member("int grid[ROWS][4];");
        assert_eq!(
            m.array_dimensions,
            vec![
                ArrayDimension::Symbolic("ROWS".to_string()),
                ArrayDimension::Fixed(4)
            ]
        );

        let m = member("uint8_t data[];");
        assert_eq!(m.array_size(), Some(&ArrayDimension::Unsized));
    }

    #[test]
    fn test_bit_field() {
        let m = member("unsigned flags : 3;");
        assert_eq!(m.name, "flags");
        assert_eq!(m.type_name, "unsigned");
        assert_eq!(m.bit_width, Some(3));
    }

    #[test]
    fn test_pointers_and_keywords() {
        let m = member("struct _Node *next;");
        assert_eq!(m.type_keyword.as_deref(), Some("struct"));
        assert_eq!(m.type_name, "_Node");
        assert_eq!(m.pointer_count, 1);

        let m = member("const char ** argv;");
        assert_eq!(m.type_name, "const char");
        assert_eq!(m.name, "argv");
        assert_eq!(m.pointer_count, 2);
        assert!(m.is_pointer);
    }

    #[test]
    fn test_multiword_type() {
        let m = member("unsigned long long total;");
        assert_eq!(m.type_name, "unsigned long long");
        assert_eq!(m.name, "total");
    }

    #[test]
    fn test_trailing_documentation() {
        let m = member("int retries; /**< Retry budget */");
        assert_eq!(m.documentation.as_deref(), Some("Retry budget"));
        assert_eq!(m.pointer_count, 0);

        let m = member("int mode; // operating mode");
        assert_eq!(m.documentation.as_deref(), Some("operating mode"));

        let m = member("/* legacy */ int old;");
        assert_eq!(m.name, "old");
        assert!(m.documentation.is_none());
    }

    #[test]
    fn test_non_members_are_skipped() {
        for line in ["union {", "} u;", "#ifdef FEATURE", "void (*cb)(int);", "int a, b;"] {
            assert!(
                matches!(parse_member_line(line), Err(SkipReason::MemberMismatch(_))),
                "{line}"
            );
        }
    }

    #[test]
    fn test_parse_body_keeps_valid_members() {
        let body = "\n    /* Header\n     * block */\n    int id;\n    union {\n        int a;\n    } u;\n    char *label; /* shown */\n";
        let results = parse_members(body);
        let members: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        let names: Vec<_> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["id", "a", "label"]);
        assert_eq!(members[2].documentation.as_deref(), Some("shown"));
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 2);
    }

    #[test]
    fn test_inline_comment_before_multiline_one() {
        let body = "int x; /* a */
/* b
 c */
int y;
";
        let names: Vec<_> = parse_members(body)
            .into_iter()
            .filter_map(Result::ok)
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["x", "y"]);
    }
}
