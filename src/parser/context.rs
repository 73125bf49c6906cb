//! Code context detection: what declaration does a comment block document?
//!
//! Rules are tried in order against the code that follows the block; the
//! first match wins. Member rules (class methods, object-literal keys) only
//! apply inside a class or prototype parent.

use crate::model::{CodeContext, ContextKind};
use regex::{Captures, Regex};
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

static RE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:export\s+(?:default\s+)?)?(?:abstract\s+)?class\s+([\w$]+)(?:\s+extends\s+([\w$.]+))?")
        .unwrap()
});

static RE_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:export\s+(?:default\s+)?)?(?:async\s+)?function\s*\*?\s*([\w$]+)\s*\(").unwrap()
});

static RE_FUNCTION_EXPR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:export\s+)?(?:var|let|const)\s+([\w$]+)\s*=\s*(?:async\s+)?(?:function\b|(?:\([^)]*\)|[\w$]+)\s*=>)",
    )
    .unwrap()
});

static RE_PROTO_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([\w$.]+)\.prototype\.([\w$]+)\s*=\s*(?:async\s+)?function\b").unwrap()
});

static RE_PROTO_PROPERTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([\w$.]+)\.prototype\.([\w$]+)\s*=\s*([^\n;]+)").unwrap());

static RE_PROTOTYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([\w$.]+)\.prototype\s*=\s*\{").unwrap());

static RE_MEMBER_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([\w$.]+)\.([\w$]+)\s*=\s*(?:async\s+)?(?:function\b|(?:\([^)]*\)|[\w$]+)\s*=>)").unwrap()
});

static RE_MEMBER_PROPERTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([\w$.]+)\.([\w$]+)\s*=\s*([^\n;]+)").unwrap());

static RE_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:var|let|const)\s+([\w$]+)\s*=\s*([^\n;]+)").unwrap()
});

// Parent-scoped rules

static RE_ACCESSOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:static\s+)?(?:get|set)\s+([\w$]+)\s*\(").unwrap());

static RE_CLASS_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:static\s+)?(?:async\s+)?\*?\s*([\w$]+)\s*\([^)]*\)\s*\{").unwrap()
});

static RE_OBJECT_METHOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([\w$]+)\s*:\s*(?:async\s+)?function\b").unwrap());

static RE_OBJECT_PROPERTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([\w$]+)\s*:\s*([^\n;,]+)").unwrap());

/// Control-flow keywords that look like `name(...) {` inside a class body.
const KEYWORDS: &[&str] = &["if", "for", "while", "switch", "catch", "function", "return", "with"];

// -----------------------------------------------------------------------------

/// Detect the context of `code`, given the enclosing class or prototype.
pub(crate) fn parse_context(code: &str, parent: Option<&CodeContext>) -> Option<CodeContext> {
    if let Some(caps) = RE_CLASS.captures(code) {
        let mut ctx = CodeContext::new(ContextKind::Class, &caps[1]);
        ctx.extends = caps.get(2).map(|m| m.as_str().to_string());
        return Some(ctx);
    }
    if let Some(caps) = RE_FUNCTION.captures(code) {
        return Some(CodeContext::new(ContextKind::Function, &caps[1]));
    }
    if let Some(caps) = RE_FUNCTION_EXPR.captures(code) {
        return Some(CodeContext::new(ContextKind::Function, &caps[1]));
    }
    if let Some(caps) = RE_PROTO_METHOD.captures(code) {
        return Some(member(ContextKind::Method, &caps));
    }
    if let Some(caps) = RE_PROTO_PROPERTY.captures(code) {
        return Some(with_value(member(ContextKind::Property, &caps), &caps, 3));
    }
    if let Some(caps) = RE_PROTOTYPE.captures(code) {
        return Some(CodeContext::new(ContextKind::Prototype, &caps[1]));
    }
    if let Some(caps) = RE_MEMBER_METHOD.captures(code) {
        return Some(member(ContextKind::Method, &caps));
    }
    if let Some(caps) = RE_MEMBER_PROPERTY.captures(code) {
        return Some(with_value(member(ContextKind::Property, &caps), &caps, 3));
    }
    if let Some(caps) = RE_DECLARATION.captures(code) {
        let ctx = CodeContext::new(ContextKind::Declaration, &caps[1]);
        return Some(with_value(ctx, &caps, 2));
    }

    let parent = parent?;
    match parent.kind {
        ContextKind::Class => parse_class_member(code, parent),
        ContextKind::Prototype => parse_object_member(code, parent),
        _ => None,
    }
}

fn parse_class_member(code: &str, parent: &CodeContext) -> Option<CodeContext> {
    if let Some(caps) = RE_ACCESSOR.captures(code) {
        return Some(owned_by(CodeContext::new(ContextKind::Property, &caps[1]), parent));
    }
    let caps = RE_CLASS_METHOD.captures(code)?;
    let name = &caps[1];
    if KEYWORDS.contains(&name) {
        return None;
    }
    let kind = if name == "constructor" {
        ContextKind::Constructor
    } else {
        ContextKind::Method
    };
    Some(owned_by(CodeContext::new(kind, name), parent))
}

fn parse_object_member(code: &str, parent: &CodeContext) -> Option<CodeContext> {
    if let Some(caps) = RE_OBJECT_METHOD.captures(code) {
        return Some(owned_by(CodeContext::new(ContextKind::Method, &caps[1]), parent));
    }
    let caps = RE_OBJECT_PROPERTY.captures(code)?;
    let ctx = owned_by(CodeContext::new(ContextKind::Property, &caps[1]), parent);
    Some(with_value(ctx, &caps, 2))
}

/// `receiver.name` from capture groups 1 and 2.
fn member(kind: ContextKind, caps: &Captures<'_>) -> CodeContext {
    let mut ctx = CodeContext::new(kind, &caps[2]);
    ctx.receiver = Some(caps[1].to_string());
    ctx
}

fn owned_by(mut ctx: CodeContext, parent: &CodeContext) -> CodeContext {
    ctx.receiver = Some(parent.name.clone());
    ctx
}

fn with_value(mut ctx: CodeContext, caps: &Captures<'_>, group: usize) -> CodeContext {
    ctx.value = caps.get(group).map(|m| m.as_str().trim().to_string());
    ctx
}
