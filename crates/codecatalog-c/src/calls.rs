//! Call-graph analysis over a single function body
//!
//! The body is tokenized and scanned for an identifier directly followed by
//! `(`. A preceding `receiver->` or `receiver.` qualifies the name. Calls in
//! comments and string literals never reach the scan.

use codecatalog_api::{FunctionCall, ParserConfig};
use log::trace;
use std::collections::HashSet;

use crate::text::{line_around, line_at, split_top_level};
use crate::tokenizer::{tokenize, Token, TokenKind};

/// One call expression as written, before any filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Callee, qualified as `receiver->name` or `receiver.name` when accessed
    /// through a member
    pub name: String,
    pub arguments: Vec<String>,
    /// Byte offset of the callee identifier
    pub offset: usize,
}

/// Every call expression in `text`, in source order.
///
/// Scanning resumes after the `)` closing each call, so a call inside
/// another call's arguments is only part of that call's argument text.
pub fn call_sites(text: &str) -> Vec<CallSite> {
    let tokens: Vec<Token<'_>> = tokenize(text).collect();
    let mut sites = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];
        if token.kind != TokenKind::Identifier
            || tokens.get(i + 1).map(|t| t.kind) != Some(TokenKind::LParen)
        {
            i += 1;
            continue;
        }

        let (arguments, consumed) = collect_arguments(&tokens[i + 2..]);
        sites.push(CallSite {
            name: qualified_name(&tokens, i),
            arguments,
            offset: token.offset,
        });
        i += 2 + consumed;
    }

    sites
}

fn qualified_name(tokens: &[Token<'_>], i: usize) -> String {
    let name = tokens[i].text;
    if i >= 2 {
        let (receiver, op) = (&tokens[i - 2], &tokens[i - 1]);
        if matches!(op.kind, TokenKind::Arrow | TokenKind::Dot)
            && receiver.kind == TokenKind::Identifier
        {
            return format!("{}{}{}", receiver.text, op.text, name);
        }
    }
    name.to_string()
}

/// Token texts up to the `)` closing an already-open `(`, split on
/// top-level commas. Adjacent words keep a separating space, and a piece
/// left empty (a literal argument) keeps its position.
///
/// Also returns how many tokens were consumed, the closing `)` included.
fn collect_arguments(tokens: &[Token<'_>]) -> (Vec<String>, usize) {
    let mut depth = 1usize;
    let mut text = String::new();
    let mut prev_word = false;
    let mut consumed = tokens.len();

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth -= 1;
                if depth == 0 {
                    consumed = i + 1;
                    break;
                }
            }
            _ => {}
        }
        let word = token.kind.is_word();
        if word && prev_word {
            text.push(' ');
        }
        text.push_str(token.text);
        prev_word = word;
    }

    (split_top_level(&text), consumed)
}

/// Outgoing calls of one function.
///
/// `content` is the whole definition and `body_start` the offset of its
/// opening `{`; only the body is scanned, but line numbers count from the
/// first line of `content`. Deny-listed names are dropped and each callee
/// is kept once, at its first occurrence.
pub fn analyze_calls(content: &str, body_start: usize, config: &ParserConfig) -> Vec<FunctionCall> {
    let mut seen = HashSet::new();
    let mut calls = Vec::new();

    for site in call_sites(&content[body_start..]) {
        if config.is_ignored(&site.name) || !seen.insert(site.name.clone()) {
            continue;
        }
        let offset = body_start + site.offset;
        let is_api = config.is_api_call(&site.name);
        trace!("Call {} (api: {is_api}) at offset {offset}", site.name);

        calls.push(
            FunctionCall::new(site.name, line_at(content, offset))
                .with_parameters(site.arguments)
                .api(is_api)
                .with_context(line_around(content, offset)),
        );
    }

    calls
}
