//! Body-level heuristics: branch counting, invocation names and heap
//! allocations.
//!
//! Every function here expects sanitized text, so keywords inside strings or
//! comments are never counted.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static BRANCH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:if|else|while|for|foreach|switch|case|catch)\b|&&|\|\|")
        .expect("valid branch regex")
});

static INVOCATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\s*(?:<[A-Za-z0-9_,\s\.<>\[\]]*>)?\s*\(")
        .expect("valid invocation regex")
});

static COLLECTION_ALLOCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\bnew\s+(?:System\.Collections\.Generic\.)?(?:List|Dictionary|HashSet|Queue|Stack|LinkedList|SortedList|SortedDictionary|StringBuilder|string|String)\b",
    )
    .expect("valid allocation regex")
});

static ARRAY_ALLOCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bnew\s+[A-Za-z_][A-Za-z0-9_\.]*\s*\[").expect("valid array regex")
});

/// Words followed by `(` that are statements or operators rather than calls.
const NON_CALL_KEYWORDS: &[&str] = &[
    "if", "else", "while", "for", "foreach", "switch", "catch", "using", "lock", "return",
    "new", "typeof", "sizeof", "nameof", "default", "checked", "unchecked", "fixed", "when",
    "await", "throw", "base", "this", "in", "is", "as", "get", "set", "value", "var",
];

/// `1 + count(branching keywords and short-circuit operators)`.
pub fn cyclomatic_complexity(body: &str) -> u32 {
    let branches = BRANCH_PATTERN.find_iter(body).count();
    1 + u32::try_from(branches).unwrap_or(u32::MAX - 1)
}

/// Distinct names of invoked methods, sorted.
///
/// Member access is kept as the last segment: `transform.GetComponent<T>()`
/// yields `GetComponent`.
pub fn invocations(body: &str) -> Vec<String> {
    INVOCATION_PATTERN
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| !NON_CALL_KEYWORDS.contains(name))
        .filter(|name| !is_constructor_call(body, name))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Whether every occurrence of `name(` in the body is preceded by `new`.
fn is_constructor_call(body: &str, name: &str) -> bool {
    let mut saw_any = false;
    for (offset, _) in body.match_indices(name) {
        let before = body[..offset].trim_end();
        let after = body[offset + name.len()..].trim_start();
        if !after.starts_with('(') && !after.starts_with('<') {
            continue;
        }
        let preceded_by_ident = body[..offset]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_');
        if preceded_by_ident {
            continue;
        }
        saw_any = true;
        if !before.ends_with("new") {
            return false;
        }
    }
    saw_any
}

/// Count of collection, string builder and array allocations.
pub fn heap_allocations(body: &str) -> usize {
    COLLECTION_ALLOCATION.find_iter(body).count() + ARRAY_ALLOCATION.find_iter(body).count()
}

/// Lines spanned by `text`, counting a trailing partial line.
pub fn line_count(text: &str) -> usize {
    if text.is_empty() {
        0
    } else {
        text.lines().count()
    }
}

/// Whether a brace body holds nothing but whitespace.
pub fn is_empty_block(body: &str) -> bool {
    body.trim()
        .trim_start_matches('{')
        .trim_end_matches('}')
        .trim()
        .is_empty()
}
