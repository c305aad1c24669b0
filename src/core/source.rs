//! Structural facts extracted from source files.
//!
//! These types are the only thing downstream stages know about source code;
//! the extraction strategy behind them can change without touching the graph
//! builder, the pattern rules or the generators.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AccessModifier {
    Public,
    Protected,
    Internal,
    ProtectedInternal,
    PrivateProtected,
    #[default]
    Private,
}

impl AccessModifier {
    /// Resolve the access level from the modifier keywords of a declaration.
    ///
    /// Members without an explicit modifier are private, matching C# defaults
    /// for class members.
    pub fn from_modifiers<'a>(modifiers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut public = false;
        let mut protected = false;
        let mut internal = false;
        let mut private = false;
        for modifier in modifiers {
            match modifier {
                "public" => public = true,
                "protected" => protected = true,
                "internal" => internal = true,
                "private" => private = true,
                _ => {}
            }
        }

        match (public, protected, internal, private) {
            (true, _, _, _) => Self::Public,
            (_, true, true, _) => Self::ProtectedInternal,
            (_, true, _, true) => Self::PrivateProtected,
            (_, true, _, _) => Self::Protected,
            (_, _, true, _) => Self::Internal,
            _ => Self::Private,
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Self::Public)
    }

    pub fn is_private(&self) -> bool {
        matches!(self, Self::Private)
    }
}

impl std::fmt::Display for AccessModifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Internal => "internal",
            Self::ProtectedInternal => "protected internal",
            Self::PrivateProtected => "private protected",
            Self::Private => "private",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Class,
    Struct,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodModifiers {
    pub is_static: bool,
    pub is_virtual: bool,
    pub is_override: bool,
    pub is_async: bool,
    pub is_abstract: bool,
}

impl MethodModifiers {
    pub fn from_keywords<'a>(keywords: impl IntoIterator<Item = &'a str>) -> Self {
        keywords
            .into_iter()
            .fold(Self::default(), |mut acc, keyword| {
                match keyword {
                    "static" => acc.is_static = true,
                    "virtual" => acc.is_virtual = true,
                    "override" => acc.is_override = true,
                    "async" => acc.is_async = true,
                    "abstract" => acc.is_abstract = true,
                    _ => {}
                }
                acc
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
    /// `ref`, `out`, `in`, `params` or `this`
    pub modifier: Option<String>,
    pub has_default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDefinition {
    pub name: String,
    /// Empty for constructors
    pub return_type: String,
    pub parameters: Vec<Parameter>,
    pub access: AccessModifier,
    pub modifiers: MethodModifiers,
    pub is_constructor: bool,
    pub attributes: Vec<String>,
    /// `1 + count(branching keywords)` over the body text
    pub cyclomatic_complexity: u32,
    pub lines_of_code: usize,
    /// 1-based line of the declaration in its file
    pub line: usize,
    /// Names of methods invoked in the body, sorted and deduplicated
    pub invocations: Vec<String>,
    /// `new` expressions of heap-allocated collection/builder types or arrays
    pub heap_allocations: usize,
    /// Body contains no statements (`{ }`)
    pub is_empty: bool,
}

impl MethodDefinition {
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            return_type: "void".to_string(),
            parameters: Vec::new(),
            access: AccessModifier::Private,
            modifiers: MethodModifiers::default(),
            is_constructor: false,
            attributes: Vec::new(),
            cyclomatic_complexity: 1,
            lines_of_code: 0,
            line,
            invocations: Vec::new(),
            heap_allocations: 0,
            is_empty: false,
        }
    }

    pub fn invokes(&self, name: &str) -> bool {
        self.invocations.binary_search_by(|probe| probe.as_str().cmp(name)).is_ok()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|attr| attr == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub type_name: String,
    pub access: AccessModifier,
    pub is_static: bool,
    pub is_readonly: bool,
    pub is_const: bool,
    /// Declared with the `event` keyword
    pub is_event: bool,
    /// Typed as a delegate (`Action`, `UnityEvent`, a delegate declared in the file, ...)
    pub is_delegate: bool,
    /// Initialised directly with a string literal
    pub has_literal_initializer: bool,
    pub attributes: Vec<String>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    pub type_name: String,
    pub access: AccessModifier,
    pub is_static: bool,
    pub has_getter: bool,
    pub has_setter: bool,
    pub attributes: Vec<String>,
    pub line: usize,
}

/// One class or struct declaration.
///
/// The split between `base_types` and `interfaces` is a naming heuristic: an
/// inherited name starting with `I` followed by an uppercase letter is taken
/// to be an interface. No type resolution is involved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub name: String,
    pub namespace: Option<String>,
    pub file_path: PathBuf,
    pub access: AccessModifier,
    pub kind: TypeKind,
    pub base_types: BTreeSet<String>,
    pub interfaces: BTreeSet<String>,
    pub methods: Vec<MethodDefinition>,
    pub fields: Vec<FieldDefinition>,
    pub properties: Vec<PropertyDefinition>,
    pub attributes: Vec<String>,
    /// `using` directives of the declaring file
    pub usings: Vec<String>,
    pub lines_of_code: usize,
    pub complexity: u32,
    pub line: usize,
    pub is_abstract: bool,
    pub is_static: bool,
    pub is_partial: bool,
    pub is_generic: bool,
    pub has_doc_comment: bool,
    /// Brace scanning hit the nesting bound or end of file before closing
    pub body_truncated: bool,
}

impl ClassDefinition {
    pub fn new(name: impl Into<String>, file_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            file_path: file_path.into(),
            access: AccessModifier::Internal,
            kind: TypeKind::Class,
            base_types: BTreeSet::new(),
            interfaces: BTreeSet::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            attributes: Vec::new(),
            usings: Vec::new(),
            lines_of_code: 0,
            complexity: 1,
            line: 1,
            is_abstract: false,
            is_static: false,
            is_partial: false,
            is_generic: false,
            has_doc_comment: false,
            body_truncated: false,
        }
    }

    /// Fully qualified name: `Namespace.Name`, or just `Name` when the file
    /// declares no namespace.
    pub fn full_name(&self) -> String {
        match &self.namespace {
            Some(ns) if !ns.is_empty() => format!("{}.{}", ns, self.name),
            _ => self.name.clone(),
        }
    }

    /// Base types and interfaces together.
    pub fn inherited_names(&self) -> impl Iterator<Item = &String> {
        self.base_types.iter().chain(self.interfaces.iter())
    }

    pub fn inherits(&self, name: &str) -> bool {
        self.base_types.contains(name) || self.interfaces.contains(name)
    }

    pub fn constructors(&self) -> impl Iterator<Item = &MethodDefinition> {
        self.methods.iter().filter(|m| m.is_constructor)
    }

    pub fn regular_methods(&self) -> impl Iterator<Item = &MethodDefinition> {
        self.methods.iter().filter(|m| !m.is_constructor)
    }

    pub fn find_method(&self, name: &str) -> Option<&MethodDefinition> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|attr| attr == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceDefinition {
    pub name: String,
    pub namespace: Option<String>,
    pub file_path: PathBuf,
    pub access: AccessModifier,
    pub base_interfaces: BTreeSet<String>,
    pub methods: Vec<MethodDefinition>,
    pub properties: Vec<PropertyDefinition>,
    pub lines_of_code: usize,
    pub line: usize,
}

impl InterfaceDefinition {
    pub fn full_name(&self) -> String {
        match &self.namespace {
            Some(ns) if !ns.is_empty() => format!("{}.{}", ns, self.name),
            _ => self.name.clone(),
        }
    }
}

/// Heuristic interface test: leading `I` followed by an uppercase letter.
pub fn looks_like_interface(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('I'), Some(second)) if second.is_ascii_uppercase()
    )
}
