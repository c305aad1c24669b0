//! Lexical C# extractor.
//!
//! Works on sanitized text only. Declarations are located with regular
//! expressions, bodies with a bounded brace scan, and members with the
//! passes in [`super::members`].

use super::complexity;
use super::lexer::{brace_balance, sanitize, scan_block};
use super::members::{attribute_names, extract_members, split_top_level, MemberContext};
use super::{FileFacts, LineIndex, SourceExtractor};
use crate::core::source::looks_like_interface;
use crate::core::{AccessModifier, ClassDefinition, InterfaceDefinition, TypeKind};
use crate::errors::AnalysisError;
use crate::observability::set_current_type;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::trace;

static NAMESPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bnamespace\s+([A-Za-z_][A-Za-z0-9_\.]*)").expect("valid namespace regex")
});

static USING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:global\s+)?using\s+(?:static\s+)?([A-Za-z_][A-Za-z0-9_\.]*)\s*;")
        .expect("valid using regex")
});

static DELEGATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bdelegate\s+[A-Za-z_][A-Za-z0-9_<>,\.\[\]\?\s]*?\s([A-Za-z_][A-Za-z0-9_]*)\s*(?:<[^>]*>)?\s*\(")
        .expect("valid delegate regex")
});

static TYPE_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<attrs>(?:\[[^\[\]]*(?:\[[^\[\]]*\][^\[\]]*)*\]\s*)*)(?P<mods>(?:\b(?:public|private|protected|internal|static|abstract|sealed|partial|unsafe|new|readonly|ref|file)\s+)*)\b(?P<kind>class|struct|interface|record(?:\s+(?:class|struct))?)\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*)",
    )
    .expect("valid type declaration regex")
});

/// Extractor for `.cs` files.
#[derive(Debug, Clone)]
pub struct CSharpExtractor {
    max_brace_depth: usize,
}

impl Default for CSharpExtractor {
    fn default() -> Self {
        Self::new(64)
    }
}

impl CSharpExtractor {
    pub fn new(max_brace_depth: usize) -> Self {
        Self {
            max_brace_depth: max_brace_depth.max(1),
        }
    }
}

impl SourceExtractor for CSharpExtractor {
    fn language(&self) -> &'static str {
        "csharp"
    }

    fn extensions(&self) -> &[&'static str] {
        &["cs"]
    }

    fn extract(&self, source: &str, path: &Path) -> Result<FileFacts, AnalysisError> {
        if source.contains('\0') {
            return Err(AnalysisError::parse_with_path("file contains NUL bytes", path));
        }
        let text = sanitize(source);
        let lines = LineIndex::new(&text);
        check_balance(&text, &lines, path)?;

        let file = FileScan {
            text: &text,
            original: source,
            lines: &lines,
            path,
            namespace: first_namespace(&text),
            usings: usings(&text),
            delegates: delegate_names(&text),
            max_brace_depth: self.max_brace_depth,
        };

        let mut facts = FileFacts::default();
        for caps in TYPE_DECLARATION.captures_iter(&text) {
            let Some(declaration) = TypeHeader::from_captures(&caps, &text) else {
                continue;
            };
            let _ty = set_current_type(declaration.name);
            match declaration.kind {
                DeclaredKind::Interface => facts.interfaces.push(file.interface(&declaration)),
                DeclaredKind::Class | DeclaredKind::Struct => {
                    facts.classes.push(file.class(&declaration))
                }
            }
        }
        trace!(
            path = %path.display(),
            classes = facts.classes.len(),
            interfaces = facts.interfaces.len(),
            "extracted file"
        );
        Ok(facts)
    }
}

fn check_balance(text: &str, lines: &LineIndex, path: &Path) -> Result<(), AnalysisError> {
    match brace_balance(text) {
        (_, Some(offset)) => Err(AnalysisError::parse_with_context(
            "unmatched closing brace",
            path,
            lines.line_of(offset),
        )),
        (0, None) => Ok(()),
        (open, None) => Err(AnalysisError::parse_with_path(
            format!("{} unclosed brace(s)", open),
            path,
        )),
    }
}

/// Only the first namespace declaration is used for every type in the file.
fn first_namespace(text: &str) -> Option<String> {
    NAMESPACE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn usings(text: &str) -> Vec<String> {
    USING
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

fn delegate_names(text: &str) -> BTreeSet<String> {
    DELEGATE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclaredKind {
    Class,
    Struct,
    Interface,
}

/// A located type declaration, up to and including its body's `{`.
struct TypeHeader<'t> {
    name: &'t str,
    kind: DeclaredKind,
    modifiers: Vec<&'t str>,
    attributes: Vec<String>,
    /// Start of the declaration including attributes
    start: usize,
    name_offset: usize,
    is_generic: bool,
    bases: Vec<String>,
    /// Offset of the body `{`; `None` for `record R(...);`
    open_brace: Option<usize>,
}

impl<'t> TypeHeader<'t> {
    fn from_captures(caps: &regex::Captures<'t>, text: &'t str) -> Option<Self> {
        let whole = caps.get(0)?;
        let name = caps.name("name")?;
        let kind_match = caps.name("kind")?;
        if name.as_str() == "where" || in_constraint_clause(text, kind_match.start()) {
            return None;
        }
        let kind = match kind_match.as_str() {
            "interface" => DeclaredKind::Interface,
            "struct" | "record struct" => DeclaredKind::Struct,
            _ => DeclaredKind::Class,
        };
        let modifiers = caps
            .name("mods")
            .map(|m| m.as_str().split_whitespace().collect())
            .unwrap_or_default();
        let attributes = caps
            .name("attrs")
            .map(|m| {
                m.as_str()
                    .split(']')
                    .filter_map(|chunk| chunk.trim().strip_prefix('['))
                    .flat_map(attribute_names)
                    .collect()
            })
            .unwrap_or_default();

        let (rest, open_brace) = header_tail(text, name.end())?;
        let (is_generic, bases) = parse_header_tail(rest);

        Some(Self {
            name: name.as_str(),
            kind,
            modifiers,
            attributes,
            start: whole.start(),
            name_offset: name.start(),
            is_generic,
            bases,
            open_brace,
        })
    }
}

/// `class`/`struct` after `:` or `,` is a generic constraint such as
/// `where T : class`, not a declaration.
fn in_constraint_clause(text: &str, kind_start: usize) -> bool {
    text[..kind_start].trim_end().ends_with([':', ','])
}

/// Text between the type name and the body's `{` (or a terminating `;`).
fn header_tail(text: &str, from: usize) -> Option<(&str, Option<usize>)> {
    let bytes = text.as_bytes();
    let mut parens = 0usize;
    for (offset, &b) in bytes.iter().enumerate().skip(from) {
        match b {
            b'(' => parens += 1,
            b')' => parens = parens.saturating_sub(1),
            b'{' if parens == 0 => return Some((&text[from..offset], Some(offset))),
            b';' if parens == 0 => return Some((&text[from..offset], None)),
            b'}' if parens == 0 => return None,
            _ => {}
        }
    }
    None
}

/// Generic parameter list, primary constructor and base list from the text
/// after a type name: `<T> (int x) : Base<T>, IFoo where T : class`.
fn parse_header_tail(tail: &str) -> (bool, Vec<String>) {
    let mut rest = tail.trim_start();
    let is_generic = rest.starts_with('<');
    if is_generic {
        rest = skip_balanced(rest, '<', '>');
    }
    rest = rest.trim_start();
    if rest.starts_with('(') {
        rest = skip_balanced(rest, '(', ')');
    }
    let Some(list) = rest.trim_start().strip_prefix(':') else {
        return (is_generic, Vec::new());
    };
    let list = cut_at_where(list);
    let bases = split_top_level(list, ',')
        .into_iter()
        .filter_map(simple_type_name)
        .collect();
    (is_generic, bases)
}

fn skip_balanced(text: &str, open: char, close: char) -> &str {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return &text[i + c.len_utf8()..];
            }
        }
    }
    ""
}

fn cut_at_where(list: &str) -> &str {
    static WHERE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bwhere\b").expect("valid where regex"));
    match WHERE.find(list) {
        Some(m) => &list[..m.start()],
        None => list,
    }
}

/// `global::UnityEngine.MonoBehaviour` → `MonoBehaviour`,
/// `IEquatable<Foo>` → `IEquatable`, `Base(x)` → `Base`.
pub(crate) fn simple_type_name(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let raw = raw.strip_prefix("global::").unwrap_or(raw);
    let raw = raw.split(['<', '(']).next().unwrap_or(raw).trim();
    let name = raw.rsplit('.').next().unwrap_or(raw).trim_end_matches('?').trim();
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_alphanumeric() || c == '_');
    valid.then(|| name.to_string())
}

/// Per-file state shared by every declaration in the file.
struct FileScan<'a> {
    text: &'a str,
    original: &'a str,
    lines: &'a LineIndex,
    path: &'a Path,
    namespace: Option<String>,
    usings: Vec<String>,
    delegates: BTreeSet<String>,
    max_brace_depth: usize,
}

/// Location of a type body inside the sanitized text.
struct Body {
    /// Offsets of the inside, without the outer braces
    inner: (usize, usize),
    /// The full `{ ... }` span
    outer: (usize, usize),
    truncated: bool,
}

impl FileScan<'_> {
    fn body(&self, header: &TypeHeader<'_>) -> Option<Body> {
        let open = header.open_brace?;
        let scan = scan_block(self.text, open, self.max_brace_depth);
        let inner_end = scan.close.unwrap_or(scan.end);
        Some(Body {
            inner: (open + 1, inner_end.max(open + 1)),
            outer: (open, scan.end),
            truncated: scan.truncated,
        })
    }

    fn members(&self, header: &TypeHeader<'_>, body: &Body) -> super::members::Members {
        let ctx = MemberContext {
            text: self.text,
            lines: self.lines,
            type_name: header.name,
            implicit_public: header.kind == DeclaredKind::Interface,
            delegates: &self.delegates,
        };
        extract_members(&ctx, body.inner.0, body.inner.1)
    }

    fn class(&self, header: &TypeHeader<'_>) -> ClassDefinition {
        let mut class = ClassDefinition::new(header.name, self.path);
        class.namespace = self.namespace.clone();
        class.access = type_access(&header.modifiers);
        class.kind = match header.kind {
            DeclaredKind::Struct => TypeKind::Struct,
            _ => TypeKind::Class,
        };
        for base in &header.bases {
            if looks_like_interface(base) {
                class.interfaces.insert(base.clone());
            } else {
                class.base_types.insert(base.clone());
            }
        }
        class.attributes = header.attributes.clone();
        class.usings = self.usings.clone();
        class.line = self.lines.line_of(header.name_offset);
        class.is_abstract = header.modifiers.contains(&"abstract");
        class.is_static = header.modifiers.contains(&"static");
        class.is_partial = header.modifiers.contains(&"partial");
        class.is_generic = header.is_generic;
        class.has_doc_comment = has_doc_comment(self.original, self.lines, header.start);

        if let Some(body) = self.body(header) {
            let outer = &self.text[body.outer.0..body.outer.1];
            class.lines_of_code = complexity::line_count(outer);
            class.complexity = complexity::cyclomatic_complexity(outer);
            class.body_truncated = body.truncated;
            let members = self.members(header, &body);
            class.methods = members.methods;
            class.fields = members.fields;
            class.properties = members.properties;
        }
        class
    }

    fn interface(&self, header: &TypeHeader<'_>) -> InterfaceDefinition {
        let (methods, properties, lines_of_code) = match self.body(header) {
            Some(body) => {
                let members = self.members(header, &body);
                let outer = &self.text[body.outer.0..body.outer.1];
                (
                    members.methods,
                    members.properties,
                    complexity::line_count(outer),
                )
            }
            None => (Vec::new(), Vec::new(), 0),
        };
        InterfaceDefinition {
            name: header.name.to_string(),
            namespace: self.namespace.clone(),
            file_path: self.path.to_path_buf(),
            access: type_access(&header.modifiers),
            base_interfaces: header.bases.iter().cloned().collect(),
            methods,
            properties,
            lines_of_code,
            line: self.lines.line_of(header.name_offset),
        }
    }
}

/// Types without an access keyword are internal.
fn type_access(modifiers: &[&str]) -> AccessModifier {
    let explicit = modifiers
        .iter()
        .any(|m| matches!(*m, "public" | "private" | "protected" | "internal"));
    if explicit {
        AccessModifier::from_modifiers(modifiers.iter().copied())
    } else {
        AccessModifier::Internal
    }
}

/// Whether the line above a declaration closes an XML doc or block comment.
fn has_doc_comment(original: &str, lines: &LineIndex, declaration_start: usize) -> bool {
    let line = lines.line_of(declaration_start);
    original
        .lines()
        .take(line.saturating_sub(1))
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .is_some_and(|previous| previous.starts_with("///") || previous.ends_with("*/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn extract(source: &str) -> FileFacts {
        CSharpExtractor::default()
            .extract(source, &PathBuf::from("Assets/Scripts/Test.cs"))
            .unwrap()
    }

    #[test]
    fn test_n_classes_with_namespace() {
        let source = indoc! {"
            using UnityEngine;
            using System.Collections.Generic;

            namespace Game.Core
            {
                public class Player : MonoBehaviour, IDamageable { }
                internal sealed class Inventory { }
                public struct Stats { public int hp; }
            }
        "};
        let facts = extract(source);
        let names: Vec<_> = facts.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Player", "Inventory", "Stats"]);
        assert!(facts
            .classes
            .iter()
            .all(|c| c.namespace.as_deref() == Some("Game.Core")));

        let player = &facts.classes[0];
        assert_eq!(player.full_name(), "Game.Core.Player");
        assert!(player.base_types.contains("MonoBehaviour"));
        assert!(player.interfaces.contains("IDamageable"));
        assert_eq!(player.usings, vec!["UnityEngine", "System.Collections.Generic"]);
        assert_eq!(player.line, 6);

        assert_eq!(facts.classes[1].access, AccessModifier::Internal);
        assert_eq!(facts.classes[2].kind, TypeKind::Struct);
        assert_eq!(facts.classes[2].fields.len(), 1);
    }

    #[test]
    fn test_file_scoped_namespace() {
        let facts = extract("namespace Game.UI;\n\npublic class Hud { }\n");
        assert_eq!(facts.classes[0].full_name(), "Game.UI.Hud");
    }

    #[test]
    fn test_only_first_namespace_is_used() {
        let source = indoc! {"
            namespace First { class A { } }
            namespace Second { class B { } }
        "};
        let facts = extract(source);
        assert_eq!(facts.classes[0].full_name(), "First.A");
        // misattributed: B really lives in Second
        assert_eq!(facts.classes[1].full_name(), "First.B");
    }

    #[test]
    fn test_keywords_in_strings_and_comments_are_ignored() {
        let source = indoc! {r#"
            // class Fake { }
            public class Real
            {
                /* if (x) { } */
                private string text = "class Inner { if while }";
                public void Run() { var s = "}"; }
            }
        "#};
        let facts = extract(source);
        assert_eq!(facts.classes.len(), 1);
        let real = &facts.classes[0];
        assert_eq!(real.complexity, 1);
        assert_eq!(real.methods.len(), 1);
        assert!(real.fields[0].has_literal_initializer);
    }

    #[test]
    fn test_interfaces_and_generics() {
        let source = indoc! {"
            public interface IRepository<T> : IDisposable where T : class
            {
                T Find(int id);
                int Count { get; }
            }
            public abstract class Repository<T> : IRepository<T> where T : class, new()
            {
                public abstract T Find(int id);
            }
        "};
        let facts = extract(source);
        assert_eq!(facts.interfaces.len(), 1);
        let repo = &facts.interfaces[0];
        assert_eq!(repo.name, "IRepository");
        assert!(repo.base_interfaces.contains("IDisposable"));
        assert_eq!(repo.methods.len(), 1);
        assert!(repo.methods[0].access.is_public());
        assert_eq!(repo.properties.len(), 1);

        let class = &facts.classes[0];
        assert!(class.is_generic && class.is_abstract);
        assert!(class.interfaces.contains("IRepository"));
        assert!(class.base_types.is_empty());
    }

    #[test]
    fn test_nested_class_members_stay_with_nested_class() {
        let source = indoc! {"
            public class Outer
            {
                private int a;
                private class Inner
                {
                    private int b;
                    void Work() { }
                }
            }
        "};
        let facts = extract(source);
        let outer = &facts.classes[0];
        let inner = &facts.classes[1];
        assert_eq!(outer.fields.len(), 1);
        assert!(outer.methods.is_empty());
        assert_eq!(inner.name, "Inner");
        assert_eq!(inner.fields[0].name, "b");
        assert_eq!(inner.methods.len(), 1);
    }

    #[test]
    fn test_attributes_and_doc_comment() {
        let source = indoc! {r#"
            /// <summary>Settings asset.</summary>
            [CreateAssetMenu(menuName = "Game/Settings")]
            [System.Serializable]
            public class GameSettings : ScriptableObject { }

            public class Undocumented { }
        "#};
        let facts = extract(source);
        let settings = &facts.classes[0];
        assert_eq!(settings.attributes, vec!["CreateAssetMenu", "Serializable"]);
        assert!(settings.has_doc_comment);
        assert!(!facts.classes[1].has_doc_comment);
    }

    #[test]
    fn test_record_and_primary_constructor() {
        let source = "public record Score(int Value) : BaseScore(Value), IComparable;\n";
        let facts = extract(source);
        let score = &facts.classes[0];
        assert!(score.base_types.contains("BaseScore"));
        assert!(score.interfaces.contains("IComparable"));
        assert_eq!(score.lines_of_code, 0);
    }

    #[test]
    fn test_depth_bound_truncates_body() {
        let source = indoc! {"
            class Deep
            {
                void M()
                {
                    if (a) { if (b) { if (c) { } } }
                }
            }
        "};
        let facts = CSharpExtractor::new(3)
            .extract(source, Path::new("Deep.cs"))
            .unwrap();
        assert_eq!(facts.classes.len(), 1);
        assert!(facts.classes[0].body_truncated);
    }

    #[test]
    fn test_unbalanced_braces_are_parse_errors() {
        let err = CSharpExtractor::default()
            .extract("class A { void M() { }\n", Path::new("A.cs"))
            .unwrap_err();
        assert_eq!(err.category(), "Parse");

        let err = CSharpExtractor::default()
            .extract("class A { }\n}\n", Path::new("A.cs"))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Parse { line: Some(2), .. }));
    }

    #[test]
    fn test_delegate_declarations_mark_fields() {
        let source = indoc! {"
            public delegate void HealthChanged(int value);
            public class Health
            {
                public HealthChanged onChanged;
            }
        "};
        let facts = extract(source);
        assert!(facts.classes[0].fields[0].is_delegate);
    }

    #[test]
    fn test_where_class_constraint_is_not_a_declaration() {
        let source = indoc! {"
            public class Pool<T> where T : class
            {
                public T Get() { return null; }
            }
        "};
        let facts = extract(source);
        assert_eq!(facts.classes.len(), 1);
        assert_eq!(facts.classes[0].methods[0].return_type, "T");
    }

    #[test]
    fn test_chained_constraints_do_not_declare_types() {
        let source = indoc! {"
            public class Pool<T, U> where T : class where U : struct
            {
                public T Get(U key) { return null; }
            }
        "};
        let facts = extract(source);
        let names: Vec<&str> = facts.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Pool"]);
        assert_eq!(facts.classes[0].methods.len(), 1);
    }

    #[test]
    fn test_simple_type_name() {
        assert_eq!(
            simple_type_name(" global::UnityEngine.MonoBehaviour "),
            Some("MonoBehaviour".to_string())
        );
        assert_eq!(simple_type_name("IEquatable<Foo>"), Some("IEquatable".to_string()));
        assert_eq!(simple_type_name("  "), None);
    }
}
