//! Offset, line and delimiter helpers shared by the extractors.

/// Index of the delimiter closing the one at `open`, counting nesting depth.
///
/// Plain byte counting: delimiters inside comments or literals are counted
/// like any other.
pub fn find_matching(source: &str, open: usize, open_ch: u8, close_ch: u8) -> Option<usize> {
    let bytes = source.as_bytes();
    if bytes.get(open) != Some(&open_ch) {
        return None;
    }
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if b == open_ch {
            depth += 1;
        } else if b == close_ch {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Split on commas that are not nested inside parentheses.
///
/// Pieces are trimmed; blank input gives no pieces.
pub fn split_top_level(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut pieces = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                pieces.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    pieces.push(current.trim().to_string());
    pieces
}

/// Collapse runs of whitespace to single spaces
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Line lookup over one source file
#[derive(Debug)]
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// 1-based line containing `offset`
    pub fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(i) => i + 1,
            Err(i) => i,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Text of 1-based `line`, without its newline
    pub fn line(&self, line: usize) -> &'a str {
        let Some(&start) = self.line_starts.get(line.wrapping_sub(1)) else {
            return "";
        };
        let end = self
            .line_starts
            .get(line)
            .map_or(self.source.len(), |&next| next - 1);
        self.source[start..end].trim_end_matches('\r')
    }

    /// Up to `count` lines before `first_line` and after `last_line`
    pub fn context(&self, first_line: usize, last_line: usize, count: usize) -> (String, String) {
        let before_start = first_line.saturating_sub(count).max(1);
        let before = (before_start..first_line)
            .map(|l| self.line(l))
            .collect::<Vec<_>>()
            .join("\n");

        let after_end = last_line.saturating_add(count).min(self.line_count());
        let after = (last_line + 1..=after_end)
            .map(|l| self.line(l))
            .collect::<Vec<_>>()
            .join("\n");

        (before, after)
    }
}

/// 1-based line of `offset` counted directly, for text without an index
pub fn line_at(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

/// The full line of `text` around `offset`, trimmed
pub fn line_around(text: &str, offset: usize) -> &str {
    let start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    let end = text[offset..].find('\n').map_or(text.len(), |i| offset + i);
    text[start..end].trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_matching_nested() {
        let src = "f(a, (b), c) {";
        assert_eq!(find_matching(src, 1, b'(', b')'), Some(11));
        assert_eq!(find_matching("{ { } ", 0, b'{', b'}'), None);
        assert_eq!(find_matching("x{}", 0, b'{', b'}'), None);
    }

    #[test]
    fn test_split_top_level() {
        assert_eq!(split_top_level("int a, char *b"), vec!["int a", "char *b"]);
        assert_eq!(
            split_top_level("void (*cb)(int, int), void *ctx"),
            vec!["void (*cb)(int, int)", "void *ctx"]
        );
        assert!(split_top_level("  ").is_empty());
        assert_eq!(split_top_level("x,"), vec!["x", ""]);
    }

    #[test]
    fn test_line_index() {
        let src = "a\nbb\r\n\nccc";
        let index = LineIndex::new(src);
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_of(0), 1);
        assert_eq!(index.line_of(2), 2);
        assert_eq!(index.line_of(src.len() - 1), 4);
        assert_eq!(index.line(2), "bb");
        assert_eq!(index.line(3), "");
        assert_eq!(index.line(9), "");
    }

    #[test]
    fn test_context_window() {
        let src = "1\n2\n3\n4\n5\n6\n7";
        let index = LineIndex::new(src);
        assert_eq!(index.context(3, 4, 2), ("1\n2".to_string(), "5\n6".to_string()));
        assert_eq!(index.context(1, 7, 5), (String::new(), String::new()));
    }

    #[test]
    fn test_context_window_with_huge_count() {
        let index = LineIndex::new("1\n2\n3");
        assert_eq!(
            index.context(2, 2, usize::MAX),
            ("1".to_string(), "3".to_string())
        );
    }

    #[test]
    fn test_line_helpers() {
        let text = "int f() {\n    g(1);\n}";
        let offset = text.find('g').unwrap();
        assert_eq!(line_at(text, offset), 2);
        assert_eq!(line_around(text, offset), "g(1);");
    }
}
