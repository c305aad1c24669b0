//! Member passes over a single type body.
//!
//! The body is first reduced to its top-level view (nested blocks blanked),
//! then split into declarations at `;` and at the `}` that closes a member
//! block. Each declaration is classified as a method, a property or a field
//! list; nested type declarations are skipped here because the file-level
//! pass extracts them on their own.

use super::complexity;
use super::lexer::mask_nested_blocks;
use super::LineIndex;
use crate::core::{
    AccessModifier, FieldDefinition, MethodDefinition, MethodModifiers, Parameter,
    PropertyDefinition,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

const MODIFIER_KEYWORDS: &[&str] = &[
    "public", "private", "protected", "internal", "static", "virtual", "override", "abstract",
    "async", "sealed", "new", "extern", "unsafe", "partial", "readonly", "const", "volatile",
    "event", "required", "fixed", "ref",
];

const TYPE_KEYWORDS: &[&str] = &["class", "struct", "interface", "enum", "record", "delegate"];

const PARAMETER_MODIFIERS: &[&str] = &["ref", "out", "in", "params", "this", "scoped"];

/// Types treated as delegates even without a local `delegate` declaration.
const DELEGATE_TYPES: &[&str] = &[
    "Action",
    "Func",
    "EventHandler",
    "UnityEvent",
    "UnityAction",
    "Delegate",
    "MulticastDelegate",
    "Predicate",
];

static MEMBER_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^(?P<pre>.*)\b(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*(?P<generics><[^()]*>)?\s*$")
        .expect("valid member name regex")
});

static ACCESSOR_GET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bget\b").expect("valid accessor regex"));

static ACCESSOR_SET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:set|init)\b").expect("valid accessor regex"));

/// Everything the member passes need to know about the enclosing type.
pub struct MemberContext<'a> {
    /// Sanitized text of the whole file
    pub text: &'a str,
    pub lines: &'a LineIndex,
    pub type_name: &'a str,
    /// Members without modifiers are public (interfaces)
    pub implicit_public: bool,
    /// Names of `delegate` types declared in the same file
    pub delegates: &'a BTreeSet<String>,
}

#[derive(Debug, Default)]
pub struct Members {
    pub methods: Vec<MethodDefinition>,
    pub fields: Vec<FieldDefinition>,
    pub properties: Vec<PropertyDefinition>,
}

/// Extract the members declared directly in `text[start..end]`, the inside
/// of a type body without its outer braces.
pub fn extract_members(ctx: &MemberContext<'_>, start: usize, end: usize) -> Members {
    let inner = &ctx.text[start..end];
    let masked = mask_nested_blocks(inner);
    let mut members = Members::default();

    for segment in split_declarations(&masked) {
        let decl = Declaration::new(&masked, segment.0, segment.1);
        if decl.is_blank() || decl.is_type_declaration() {
            continue;
        }
        match decl.classify() {
            DeclarationKind::Method { paren } => {
                if let Some(method) = parse_method(ctx, &decl, start, paren) {
                    members.methods.push(method);
                }
            }
            DeclarationKind::Property { body } => {
                if let Some(property) = parse_property(ctx, &decl, start, body) {
                    members.properties.push(property);
                }
            }
            DeclarationKind::Fields => {
                members.fields.extend(parse_fields(ctx, &decl, start));
            }
        }
    }

    members
}

/// Split a top-level view into `(start, end)` declaration spans.
fn split_declarations(masked: &str) -> Vec<(usize, usize)> {
    let bytes = masked.as_bytes();
    let mut spans = Vec::new();
    let mut start = 0;
    let mut parens = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'(' | b'[' => parens += 1,
            b')' | b']' => parens = parens.saturating_sub(1),
            b';' if parens == 0 => {
                spans.push((start, i + 1));
                start = i + 1;
            }
            b'}' if parens == 0 => {
                let continues = bytes[i + 1..]
                    .iter()
                    .find(|b| !b.is_ascii_whitespace())
                    .is_some_and(|&b| matches!(b, b'=' | b';' | b',' | b')' | b'.'));
                if !continues {
                    spans.push((start, i + 1));
                    start = i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    if start < bytes.len() {
        spans.push((start, bytes.len()));
    }
    spans
}

enum DeclarationKind {
    /// Offset (within the top-level view) of the parameter list's `(`
    Method { paren: usize },
    /// Offset of the accessor block `{` or the `=>` arrow
    Property { body: usize },
    Fields,
}

/// One top-level declaration with its leading attributes split off.
struct Declaration<'m> {
    masked: &'m str,
    /// Offset just past the attributes
    start: usize,
    end: usize,
    attributes: Vec<String>,
}

impl<'m> Declaration<'m> {
    fn new(masked: &'m str, start: usize, end: usize) -> Self {
        let (attributes, start) = split_attributes(masked, start, end);
        Self {
            masked,
            start,
            end,
            attributes,
        }
    }

    fn text(&self) -> &'m str {
        &self.masked[self.start..self.end]
    }

    fn is_blank(&self) -> bool {
        self.text().trim().trim_end_matches(';').trim().is_empty()
    }

    fn is_type_declaration(&self) -> bool {
        let head = self.head_before(|b| b == b'{' || b == b'(' || b == b'=');
        words(head).any(|w| TYPE_KEYWORDS.contains(&w))
    }

    fn head_before(&self, stop: impl Fn(u8) -> bool) -> &'m str {
        let text = self.text();
        let cut = text.bytes().position(stop).unwrap_or(text.len());
        &text[..cut]
    }

    fn classify(&self) -> DeclarationKind {
        let text = self.text();
        let bytes = text.as_bytes();
        let mut angle = 0usize;
        for (i, &b) in bytes.iter().enumerate() {
            match b {
                b'<' => angle += 1,
                b'>' if i > 0 && bytes[i - 1] == b'=' => {
                    return DeclarationKind::Property {
                        body: self.start + i - 1,
                    };
                }
                b'>' => angle = angle.saturating_sub(1),
                b'(' if angle == 0 => {
                    let before = &text[..i];
                    if ends_with_member_name(before) {
                        return DeclarationKind::Method {
                            paren: self.start + i,
                        };
                    }
                    return DeclarationKind::Fields;
                }
                b'=' if bytes.get(i + 1) != Some(&b'>') => return DeclarationKind::Fields,
                b'{' => {
                    return DeclarationKind::Property {
                        body: self.start + i,
                    };
                }
                b';' => return DeclarationKind::Fields,
                _ => {}
            }
        }
        DeclarationKind::Fields
    }
}

/// Whether text before a `(` ends in an identifier that can name a method.
fn ends_with_member_name(before: &str) -> bool {
    MEMBER_NAME
        .captures(before)
        .and_then(|caps| caps.name("name"))
        .map(|name| {
            let name = name.as_str();
            !MODIFIER_KEYWORDS.contains(&name) && !before.contains("operator")
        })
        .unwrap_or(false)
}

/// Split leading `[...]` attribute lists off a span.
fn split_attributes(masked: &str, start: usize, end: usize) -> (Vec<String>, usize) {
    let bytes = masked.as_bytes();
    let mut attributes = Vec::new();
    let mut i = start;

    loop {
        while i < end && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= end || bytes[i] != b'[' {
            break;
        }
        let mut depth = 0usize;
        let mut close = None;
        for (offset, &b) in bytes.iter().enumerate().take(end).skip(i) {
            match b {
                b'[' => depth += 1,
                b']' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(offset);
                        break;
                    }
                }
                _ => {}
            }
        }
        let Some(close) = close else { break };
        attributes.extend(attribute_names(&masked[i + 1..close]));
        i = close + 1;
    }

    (attributes, i)
}

/// `Header("x"), SerializeField` → `["Header", "SerializeField"]`;
/// target prefixes (`field:`) are dropped.
pub(crate) fn attribute_names(list: &str) -> Vec<String> {
    split_top_level(list, ',')
        .into_iter()
        .filter_map(|attr| {
            let attr = attr.trim();
            let attr = attr.rsplit_once(':').map_or(attr, |(_, rest)| rest).trim();
            let name: String = attr
                .chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '.')
                .collect();
            let name = name.rsplit('.').next().unwrap_or_default();
            let name = name.strip_suffix("Attribute").unwrap_or(name);
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

/// Split on `separator` outside of `<>`, `()`, `[]` and `{}`.
pub(crate) fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0isize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '<' | '(' | '[' | '{' => depth += 1,
            '>' | ')' | ']' | '}' => depth -= 1,
            c if c == separator && depth <= 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Whitespace-separated words, keeping generic argument lists and tuple
/// types together.
fn type_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0isize;
    let mut start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth -= 1,
            _ => {}
        }
        if c.is_whitespace() && depth <= 0 {
            if let Some(s) = start.take() {
                tokens.push(&text[s..i]);
            }
        } else if start.is_none() && !c.is_whitespace() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(&text[s..]);
    }
    tokens
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
}

fn resolve_access(modifiers: &[&str], implicit_public: bool) -> AccessModifier {
    let explicit = modifiers
        .iter()
        .any(|m| matches!(*m, "public" | "private" | "protected" | "internal"));
    if !explicit && implicit_public {
        AccessModifier::Public
    } else {
        AccessModifier::from_modifiers(modifiers.iter().copied())
    }
}

/// Split a declaration head into leading modifier keywords and the rest.
fn split_modifiers(tokens: &[&str]) -> (Vec<&'static str>, usize) {
    let mut modifiers = Vec::new();
    let mut index = 0;
    while let Some(token) = tokens.get(index) {
        match MODIFIER_KEYWORDS.iter().find(|k| **k == *token) {
            Some(keyword) => modifiers.push(*keyword),
            None => break,
        }
        index += 1;
    }
    (modifiers, index)
}

fn parse_method(
    ctx: &MemberContext<'_>,
    decl: &Declaration<'_>,
    base: usize,
    paren: usize,
) -> Option<MethodDefinition> {
    let head = &decl.masked[decl.start..paren];
    let caps = MEMBER_NAME.captures(head)?;
    let name = caps.name("name")?;
    let pre_tokens = type_tokens(caps.name("pre").map_or("", |m| m.as_str()));
    let (modifiers, type_start) = split_modifiers(&pre_tokens);
    let return_type = pre_tokens[type_start..].join(" ");

    let is_constructor = return_type.is_empty();
    if is_constructor && name.as_str() != ctx.type_name {
        return None;
    }
    // finalizers: `~Name()`
    if return_type.ends_with('~') {
        return None;
    }

    let close = matching_paren(decl.masked, paren, decl.end)?;
    let parameters = split_top_level(&decl.masked[paren + 1..close], ',')
        .into_iter()
        .filter_map(parse_parameter)
        .collect();

    let name_offset = base + decl.start + name.start();
    let mut method = MethodDefinition::new(name.as_str(), ctx.lines.line_of(name_offset));
    method.return_type = if is_constructor {
        String::new()
    } else {
        return_type
    };
    method.parameters = parameters;
    method.access = resolve_access(&modifiers, ctx.implicit_public);
    method.modifiers = MethodModifiers::from_keywords(modifiers.iter().copied());
    method.is_constructor = is_constructor;
    method.attributes = decl.attributes.clone();

    if let Some((body_start, body_end)) = method_body(decl, close) {
        let body = &ctx.text[base + body_start..base + body_end];
        method.cyclomatic_complexity = complexity::cyclomatic_complexity(body);
        method.lines_of_code = complexity::line_count(body);
        method.invocations = complexity::invocations(body);
        method.heap_allocations = complexity::heap_allocations(body);
        method.is_empty = body.trim_start().starts_with('{') && complexity::is_empty_block(body);
    }

    Some(method)
}

fn matching_paren(text: &str, open: usize, end: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, b) in text.bytes().enumerate().take(end).skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Span of a method body after its parameter list: a `{}` block or an
/// `=>` expression. Abstract and extern methods have none.
fn method_body(decl: &Declaration<'_>, close_paren: usize) -> Option<(usize, usize)> {
    let bytes = decl.masked.as_bytes();
    let mut i = close_paren + 1;
    let mut parens = 0usize;
    while i < decl.end {
        match bytes[i] {
            b'(' => parens += 1,
            b')' => parens = parens.saturating_sub(1),
            b'{' if parens == 0 => {
                let close = bytes[i..decl.end]
                    .iter()
                    .rposition(|&b| b == b'}')
                    .map(|p| i + p + 1)
                    .unwrap_or(decl.end);
                return Some((i, close));
            }
            b'=' if parens == 0 && bytes.get(i + 1) == Some(&b'>') => {
                return Some((i + 2, decl.end));
            }
            b';' if parens == 0 => return None,
            _ => {}
        }
        i += 1;
    }
    None
}

fn parse_parameter(text: &str) -> Option<Parameter> {
    let text = text.trim();
    let text = match text.strip_prefix('[') {
        Some(rest) => rest.split_once(']').map_or(rest, |(_, after)| after).trim(),
        None => text,
    };
    if text.is_empty() {
        return None;
    }
    let parts = split_top_level(text, '=');
    let has_default = parts.len() > 1;
    let decl = parts[0].trim();
    let tokens = type_tokens(decl);
    let (name, rest) = tokens.split_last()?;
    let (modifier, type_tokens) = match rest.split_first() {
        Some((first, remaining)) if PARAMETER_MODIFIERS.contains(first) => {
            (Some((*first).to_string()), remaining)
        }
        _ => (None, rest),
    };
    if type_tokens.is_empty() {
        return None;
    }
    Some(Parameter {
        name: (*name).to_string(),
        type_name: type_tokens.join(" "),
        modifier,
        has_default,
    })
}

fn parse_property(
    ctx: &MemberContext<'_>,
    decl: &Declaration<'_>,
    base: usize,
    body: usize,
) -> Option<PropertyDefinition> {
    let head = &decl.masked[decl.start..body];
    let tokens = type_tokens(head);
    let (modifiers, type_start) = split_modifiers(&tokens);
    if modifiers.contains(&"event") {
        return None;
    }
    let (name, type_parts) = tokens[type_start..].split_last()?;
    if type_parts.is_empty() || !is_identifier(name) {
        return None;
    }

    let (has_getter, has_setter) = if decl.masked.as_bytes()[body] == b'{' {
        let close = decl.masked[body..decl.end]
            .find('}')
            .map_or(decl.end, |p| body + p);
        let accessors = mask_nested_blocks(&ctx.text[base + body + 1..base + close]);
        (
            ACCESSOR_GET.is_match(&accessors),
            ACCESSOR_SET.is_match(&accessors),
        )
    } else {
        (true, false)
    };

    let name_offset = base + decl.start + find_word(head, name).unwrap_or(0);
    Some(PropertyDefinition {
        name: (*name).to_string(),
        type_name: type_parts.join(" "),
        access: resolve_access(&modifiers, ctx.implicit_public),
        is_static: modifiers.contains(&"static"),
        has_getter,
        has_setter,
        attributes: decl.attributes.clone(),
        line: ctx.lines.line_of(name_offset),
    })
}

/// Offset of `word` where it is not part of a longer identifier.
fn find_word(text: &str, word: &str) -> Option<usize> {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_';
    text.match_indices(word).map(|(i, _)| i).find(|&i| {
        let before = text[..i].chars().next_back();
        let after = text[i + word.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn parse_fields(
    ctx: &MemberContext<'_>,
    decl: &Declaration<'_>,
    base: usize,
) -> Vec<FieldDefinition> {
    // event accessor blocks (`event X E { add {} remove {} }`) end at `}`
    let text = decl.text();
    let text = text.split('{').next().unwrap_or(text);
    let text = text.trim().trim_end_matches(';');

    let declarators = split_declarators(text);
    let Some((first, rest)) = declarators.split_first() else {
        return Vec::new();
    };
    let (first_lhs, first_init) = split_initializer(first);
    let tokens = type_tokens(first_lhs);
    let (modifiers, type_start) = split_modifiers(&tokens);
    let Some((first_name, type_parts)) = tokens[type_start..].split_last() else {
        return Vec::new();
    };
    if type_parts.is_empty() || !is_identifier(first_name) {
        return Vec::new();
    }
    let type_name = type_parts.join(" ");
    let is_event = modifiers.contains(&"event");
    let is_delegate = is_event || is_delegate_type(&type_name, ctx.delegates);

    std::iter::once((*first_name, first_init))
        .chain(rest.iter().map(|&d| {
            let (lhs, init) = split_initializer(d);
            (lhs.trim(), init)
        }))
        .filter(|(name, _)| is_identifier(name))
        .map(|(name, init)| {
            let offset = base + decl.start + find_word(decl.text(), name).unwrap_or(0);
            FieldDefinition {
                name: name.to_string(),
                type_name: type_name.clone(),
                access: resolve_access(&modifiers, ctx.implicit_public),
                is_static: modifiers.contains(&"static") || modifiers.contains(&"const"),
                is_readonly: modifiers.contains(&"readonly"),
                is_const: modifiers.contains(&"const"),
                is_event,
                is_delegate,
                has_literal_initializer: init.is_some_and(is_literal),
                attributes: decl.attributes.clone(),
                line: ctx.lines.line_of(offset),
            }
        })
        .collect()
}

/// Split `a = x < y, b, c = new List<int>()` into declarators; `<` and `>`
/// only nest outside initializer expressions.
fn split_declarators(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0isize;
    let mut in_initializer = false;
    let mut start = 0;
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth -= 1,
            b'<' if !in_initializer => depth += 1,
            b'>' if !in_initializer => depth -= 1,
            b'=' if depth <= 0 => in_initializer = true,
            b',' if depth <= 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
                in_initializer = false;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn split_initializer(declarator: &str) -> (&str, Option<&str>) {
    match declarator.find('=') {
        Some(eq) => (&declarator[..eq], Some(declarator[eq + 1..].trim())),
        None => (declarator, None),
    }
}

/// String, character, numeric or boolean literal (sanitized text keeps the
/// quotes of string literals).
fn is_literal(initializer: &str) -> bool {
    let init = initializer.trim();
    let init = init.strip_prefix('-').unwrap_or(init);
    init.starts_with('"')
        || init.starts_with("@\"")
        || init.starts_with("$\"")
        || init.starts_with('\'')
        || init.starts_with(|c: char| c.is_ascii_digit())
        || init == "true"
        || init == "false"
}

fn is_delegate_type(type_name: &str, delegates: &BTreeSet<String>) -> bool {
    let base = type_name.split('<').next().unwrap_or(type_name).trim();
    let base = base.rsplit('.').next().unwrap_or(base).trim_end_matches('?');
    DELEGATE_TYPES.contains(&base) || delegates.contains(base)
}
