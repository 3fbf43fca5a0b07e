//! Function definition boundaries
//!
//! Candidates come from a line-anchored signature pattern. Each candidate is
//! then checked structurally: the parameter list must close, a `{` must come
//! before any top-level `;`, and the body's braces must balance.

use codecatalog_api::SkipReason;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

use crate::text::{find_matching, normalize_whitespace, split_top_level};
use crate::tokenizer::is_control_keyword;

/// Signature at the start of a line: qualifiers and return-type words
/// (each followed by whitespace or `*`), then the name and `(`.
static RE_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^(?:(?:static|inline|extern)\s+)*(?:[A-Za-z_]\w*(?:\s*\*+\s*|\s+))+([A-Za-z_]\w*)\s*\(",
    )
    .unwrap()
});

/// Byte offsets of an accepted function definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSpan {
    pub name: String,
    /// Start of the signature
    pub start: usize,
    pub name_start: usize,
    pub params_open: usize,
    pub params_close: usize,
    pub body_open: usize,
    /// One past the closing `}`
    pub end: usize,
}

impl FunctionSpan {
    /// The verbatim definition
    pub fn content<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// Raw text between the parameter parentheses
    pub fn parameter_text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.params_open + 1..self.params_close]
    }

    pub fn parameters(&self, source: &str) -> Vec<String> {
        split_top_level(self.parameter_text(source))
    }

    /// Words before the name, e.g. `static int` or `char *`
    pub fn return_type(&self, source: &str) -> String {
        normalize_whitespace(&source[self.start..self.name_start])
    }

    /// Declarator through the closing `)`, whitespace-normalized
    pub fn signature(&self, source: &str) -> String {
        normalize_whitespace(&source[self.start..=self.params_close])
    }
}

/// A candidate that failed a structural check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFunction {
    pub name: String,
    pub offset: usize,
    pub reason: SkipReason,
}

/// Find every function definition candidate in `source`, in order.
///
/// Accepted spans never overlap: scanning resumes after an accepted body.
pub fn find_functions(source: &str) -> Vec<Result<FunctionSpan, SkippedFunction>> {
    let mut results = Vec::new();
    let mut pos = 0;

    while pos < source.len() {
        let Some(caps) = RE_SIGNATURE.captures_at(source, pos) else {
            break;
        };
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            break;
        };

        if is_control_keyword(name.as_str()) {
            pos = whole.end();
            continue;
        }

        match check_candidate(source, whole.end() - 1) {
            Ok(end) => {
                let span = FunctionSpan {
                    name: name.as_str().to_string(),
                    start: whole.start(),
                    name_start: name.start(),
                    params_open: whole.end() - 1,
                    params_close: end.params_close,
                    body_open: end.body_open,
                    end: end.body_close + 1,
                };
                pos = span.end;
                results.push(Ok(span));
            }
            Err(reason) => {
                debug!("Skipping function candidate '{}': {reason}", name.as_str());
                results.push(Err(SkippedFunction {
                    name: name.as_str().to_string(),
                    offset: whole.start(),
                    reason,
                }));
                pos = whole.end();
            }
        }
    }

    results
}

struct Bounds {
    params_close: usize,
    body_open: usize,
    body_close: usize,
}

fn check_candidate(source: &str, params_open: usize) -> Result<Bounds, SkipReason> {
    let params_close =
        find_matching(source, params_open, b'(', b')').ok_or(SkipReason::UnbalancedParens)?;
    let body_open = find_body_open(source, params_close + 1)?;
    let body_close =
        find_matching(source, body_open, b'{', b'}').ok_or(SkipReason::UnbalancedBraces)?;
    Ok(Bounds {
        params_close,
        body_open,
        body_close,
    })
}

/// First `{` after the parameter list; a `;` outside parentheses first
/// means a prototype.
fn find_body_open(source: &str, from: usize) -> Result<usize, SkipReason> {
    let mut depth = 0i32;
    for (i, b) in source.bytes().enumerate().skip(from) {
        match b {
            b'(' => depth += 1,
            b')' => depth -= 1,
            b'{' => return Ok(i),
            b';' if depth <= 0 => return Err(SkipReason::DeclarationOnly),
            _ => {}
        }
    }
    Err(SkipReason::MissingBody)
}
