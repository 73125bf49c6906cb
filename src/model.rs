//! Data model: tagged comment records in, documentation entries out.
//!
//! Input records keep dox's JSON field names so the output of an external
//! dox run can be deserialized directly. Output entries are the interchange
//! shape consumed by renderers, so field names and presence rules are fixed.

use serde::{Deserialize, Serialize};

// -- Input: tagged comment records ---------------------------------------------

/// One `/** ... */` block as parsed from source, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaggedComment {
    pub tags: Vec<Tag>,
    pub description: Description,
    pub is_private: bool,
    pub is_constructor: bool,
    pub is_class: bool,
    pub is_event: bool,
    /// Block opened with `/*!`
    pub ignore: bool,
    /// 1-based line of the opening delimiter
    pub line: usize,
    /// Source text between this block and the next one
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ctx: Option<CodeContext>,
}

impl TaggedComment {
    /// Context of a record that names a declaration, if any.
    pub fn context(&self) -> Option<&CodeContext> {
        self.ctx.as_ref().filter(|ctx| !ctx.name.is_empty())
    }

    /// All `@param` tags, dotted children included.
    pub fn params(&self) -> impl Iterator<Item = &NamedTag> {
        self.tags.iter().filter_map(|tag| match tag {
            Tag::Param(param) => Some(param),
            _ => None,
        })
    }

    /// `@param` tags that declare a top-level parameter (no dot-notation).
    pub fn top_level_params(&self) -> impl Iterator<Item = &NamedTag> {
        self.params().filter(|param| !param.is_dotted())
    }
}

/// Free-text description of a comment block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Description {
    pub full: String,
    /// First paragraph of `full`
    pub summary: String,
    /// Remaining paragraphs of `full`
    pub body: String,
}

impl Description {
    /// Split `full` into summary and body on the first blank line.
    pub fn from_full(full: impl Into<String>) -> Self {
        let full = full.into();
        let (summary, body) = match full.split_once("\n\n") {
            Some((summary, body)) => (summary.to_string(), body.to_string()),
            None => (full.clone(), String::new()),
        };
        Self {
            full,
            summary,
            body,
        }
    }
}

/// The declaration a comment block documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeContext {
    #[serde(rename = "type")]
    pub kind: ContextKind,
    #[serde(default)]
    pub name: String,
    /// Owning class or object for members
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
}

impl CodeContext {
    pub fn new(kind: ContextKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            receiver: None,
            value: None,
            extends: None,
        }
    }
}

/// Syntactic kind of a documented declaration.
///
/// Kinds this crate does not detect itself (an external parser's `event`,
/// say) are kept verbatim in [`ContextKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContextKind {
    Class,
    Constructor,
    Method,
    Property,
    Function,
    Declaration,
    Prototype,
    Other(String),
}

impl ContextKind {
    pub fn as_str(&self) -> &str {
        match self {
            ContextKind::Class => "class",
            ContextKind::Constructor => "constructor",
            ContextKind::Method => "method",
            ContextKind::Property => "property",
            ContextKind::Function => "function",
            ContextKind::Declaration => "declaration",
            ContextKind::Prototype => "prototype",
            ContextKind::Other(kind) => kind,
        }
    }
}

impl From<String> for ContextKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "class" => ContextKind::Class,
            "constructor" => ContextKind::Constructor,
            "method" => ContextKind::Method,
            "property" => ContextKind::Property,
            "function" => ContextKind::Function,
            "declaration" => ContextKind::Declaration,
            "prototype" => ContextKind::Prototype,
            _ => ContextKind::Other(kind.clone()),
        }
    }
}

impl From<ContextKind> for String {
    fn from(kind: ContextKind) -> Self {
        match kind {
            ContextKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

/// A single `@`-annotation inside a comment block.
///
/// Closed over the kinds the normalizer understands; everything else lands
/// in [`Tag::Other`] and is excluded from every typed tag list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DoxTag", into = "DoxTag")]
pub enum Tag {
    Param(NamedTag),
    Property(NamedTag),
    Return(ReturnTag),
    Extends(ExtendsTag),
    Example(String),
    Abstract,
    Other(OtherTag),
}

/// `@param` / `@property` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedTag {
    /// Declared name token, e.g. `[sound=bark]` or `options.timeout`
    pub name: String,
    pub types: Vec<String>,
    pub description: String,
    pub optional: bool,
}

impl NamedTag {
    /// Whether the declared name uses dot-notation (`options.timeout`).
    /// Dots inside a default value (`[ratio=1.5]`) do not count.
    pub fn is_dotted(&self) -> bool {
        crate::format::format_param(&self.name).contains('.')
    }

    /// Whether any declared type is `object`, in any casing.
    pub fn is_object(&self) -> bool {
        self.types.iter().any(|t| t.eq_ignore_ascii_case("object"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnKind {
    Return,
    Returns,
}

/// `@return` / `@returns` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnTag {
    pub kind: ReturnKind,
    pub types: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtendsKind {
    Extends,
    Augments,
}

/// `@extends` / `@augments` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendsTag {
    pub kind: ExtendsKind,
    pub other_class: Option<String>,
}

/// Any tag kind without a dedicated variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherTag {
    pub kind: String,
    /// Tag text after the kind token
    pub string: String,
}

impl Tag {
    pub fn kind(&self) -> &str {
        match self {
            Tag::Param(_) => "param",
            Tag::Property(_) => "property",
            Tag::Return(tag) => match tag.kind {
                ReturnKind::Return => "return",
                ReturnKind::Returns => "returns",
            },
            Tag::Extends(tag) => match tag.kind {
                ExtendsKind::Extends => "extends",
                ExtendsKind::Augments => "augments",
            },
            Tag::Example(_) => "example",
            Tag::Abstract => "abstract",
            Tag::Other(tag) => &tag.kind,
        }
    }

    /// True for an unrecognized tag of the given kind.
    pub fn is_other(&self, kind: &str) -> bool {
        matches!(self, Tag::Other(tag) if tag.kind == kind)
    }
}

/// Flat tag shape as emitted by dox.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DoxTag {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub string: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_class: Option<String>,
}

impl From<DoxTag> for Tag {
    fn from(raw: DoxTag) -> Self {
        let named = |raw: DoxTag| NamedTag {
            name: raw.name.unwrap_or_default(),
            types: raw.types.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            optional: raw.optional.unwrap_or(false),
        };
        let returns = |kind, raw: DoxTag| ReturnTag {
            kind,
            types: raw.types.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
        };
        let kind = raw.kind.clone();
        match kind.as_str() {
            "param" => Tag::Param(named(raw)),
            "property" => Tag::Property(named(raw)),
            "return" => Tag::Return(returns(ReturnKind::Return, raw)),
            "returns" => Tag::Return(returns(ReturnKind::Returns, raw)),
            "extends" => Tag::Extends(ExtendsTag {
                kind: ExtendsKind::Extends,
                other_class: raw.other_class,
            }),
            "augments" => Tag::Extends(ExtendsTag {
                kind: ExtendsKind::Augments,
                other_class: raw.other_class,
            }),
            "example" => Tag::Example(raw.string),
            "abstract" => Tag::Abstract,
            _ => Tag::Other(OtherTag {
                kind: raw.kind,
                string: raw.string,
            }),
        }
    }
}

impl From<Tag> for DoxTag {
    fn from(tag: Tag) -> Self {
        let kind = tag.kind().to_string();
        match tag {
            Tag::Param(named) | Tag::Property(named) => DoxTag {
                kind,
                name: Some(named.name),
                types: Some(named.types),
                description: Some(named.description),
                optional: Some(named.optional),
                ..Default::default()
            },
            Tag::Return(ret) => DoxTag {
                kind,
                types: Some(ret.types),
                description: Some(ret.description),
                ..Default::default()
            },
            Tag::Extends(ext) => DoxTag {
                kind,
                other_class: ext.other_class,
                ..Default::default()
            },
            Tag::Example(string) => DoxTag {
                kind,
                string,
                ..Default::default()
            },
            Tag::Abstract => DoxTag {
                kind,
                ..Default::default()
            },
            Tag::Other(other) => DoxTag {
                kind,
                string: other.string,
                ..Default::default()
            },
        }
    }
}

/// Deserialize a JSON array of dox-compatible comment records.
pub fn records_from_json(json: &str) -> serde_json::Result<Vec<TaggedComment>> {
    serde_json::from_str(json)
}

// -- Output: documentation entries ---------------------------------------------

/// One normalized unit of output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DocEntry {
    Class(ClassEntry),
    Member(MemberEntry),
}

impl DocEntry {
    pub fn uid(&self) -> &str {
        match self {
            DocEntry::Class(entry) => &entry.uid,
            DocEntry::Member(entry) => &entry.uid,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DocEntry::Class(entry) => &entry.name,
            DocEntry::Member(entry) => &entry.name,
        }
    }
}

/// A class merged with its constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassEntry {
    pub uid: String,
    pub is_abstract: bool,
    /// Always [`ContextKind::Class`]
    #[serde(rename = "type")]
    pub kind: ContextKind,
    pub name: String,
    pub description: String,
    pub props: Vec<PropertyEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    /// Constructor signature, e.g. `Animal(name, [sound])`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<ParamEntry>>,
}

/// A documented function, method, or property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberEntry {
    pub uid: String,
    pub is_private: bool,
    #[serde(rename = "type")]
    pub kind: ContextKind,
    pub name: String,
    pub description: String,
    /// Parameter signature, e.g. `a, [b, c]`
    pub params: String,
    pub tags: MemberTags,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemberTags {
    pub example: Vec<String>,
    pub param: Vec<ParamEntry>,
    pub property: Vec<PropertyEntry>,
    pub extends: Vec<ExtendsEntry>,
    #[serde(rename = "return")]
    pub returns: Vec<ReturnEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamEntry {
    pub name: String,
    pub is_optional: bool,
    pub types: Vec<String>,
    pub description: String,
    /// Only set on optional params that declare `=default`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Dot-notation children of an `object`-typed constructor param
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<Vec<ParamEntry>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyEntry {
    pub name: String,
    pub types: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtendsEntry {
    #[serde(rename = "type")]
    pub kind: ExtendsKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnEntry {
    pub types: Vec<String>,
    pub description: String,
}
