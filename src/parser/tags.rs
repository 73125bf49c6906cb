//! Tag parser: turns a gutter-stripped block body into a description and a
//! list of typed tags, and derives the record flags from them.

use crate::model::*;
use regex::Regex;
use std::sync::LazyLock;

/// A tag starts at the beginning of a line.
static RE_TAG_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*@").unwrap());

/// `{Type}` token as the first tag part.
static RE_TYPE_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\{.+\}$").unwrap());

/// Parse one block body. Context, code, line and `ignore` are left for the
/// caller to fill in.
pub(crate) fn parse_comment(body: &str) -> TaggedComment {
    let mut pieces: Vec<&str> = RE_TAG_START.split(body.trim()).collect();
    // A block that opens straight with a tag has no description
    let has_description = pieces.first().is_some_and(|first| !first.starts_with('@'));
    let description = if has_description {
        pieces.remove(0).trim_end().to_string()
    } else {
        String::new()
    };

    let tags: Vec<Tag> = pieces
        .into_iter()
        .map(|piece| parse_tag(piece.strip_prefix('@').unwrap_or(piece)))
        .collect();

    let description = if description.is_empty() {
        tags.iter()
            .find_map(|tag| match tag {
                Tag::Other(other) if other.kind == "description" => Some(other.string.trim().to_string()),
                _ => None,
            })
            .unwrap_or_default()
    } else {
        description
    };

    TaggedComment {
        description: Description::from_full(description),
        is_private: tags.iter().any(is_private),
        is_constructor: tags.iter().any(|tag| {
            tag.is_other("constructor")
                || matches!(tag, Tag::Extends(ext) if ext.kind == ExtendsKind::Augments)
        }),
        is_class: tags.iter().any(|tag| tag.is_other("class")),
        is_event: tags.iter().any(|tag| tag.is_other("event")),
        tags,
        ..Default::default()
    }
}

fn is_private(tag: &Tag) -> bool {
    match tag {
        Tag::Other(other) => {
            other.kind == "private" || (other.kind == "api" && other.string.trim() == "private")
        }
        _ => false,
    }
}

/// Parse a single tag, without its leading `@`.
pub(crate) fn parse_tag(text: &str) -> Tag {
    let (first_line, rest) = match text.split_once('\n') {
        Some((first, rest)) => (first, Some(rest)),
        None => (text, None),
    };

    let mut parts = extract_tag_parts(first_line);
    let kind = if parts.is_empty() {
        String::new()
    } else {
        parts.remove(0)
    };
    if let Some(rest) = rest {
        parts.push(rest.to_string());
    }

    match kind.as_str() {
        "param" | "property" => {
            let type_token = take_type_token(&mut parts);
            let name = if parts.is_empty() {
                String::new()
            } else {
                parts.remove(0)
            };
            let (types, type_optional) = parse_types(type_token.as_deref());
            let tag = NamedTag {
                optional: type_optional || name.starts_with('['),
                name,
                types,
                description: parts.join(" "),
            };
            if kind == "param" {
                Tag::Param(tag)
            } else {
                Tag::Property(tag)
            }
        }
        "return" | "returns" => {
            let type_token = take_type_token(&mut parts);
            let (types, _) = parse_types(type_token.as_deref());
            Tag::Return(ReturnTag {
                kind: if kind == "return" {
                    ReturnKind::Return
                } else {
                    ReturnKind::Returns
                },
                types,
                description: parts.join(" "),
            })
        }
        "extends" | "augments" => Tag::Extends(ExtendsTag {
            kind: if kind == "extends" {
                ExtendsKind::Extends
            } else {
                ExtendsKind::Augments
            },
            other_class: parts.into_iter().next(),
        }),
        "example" => Tag::Example(raw_payload(text)),
        "abstract" => Tag::Abstract,
        _ => Tag::Other(OtherTag {
            kind: kind.clone(),
            string: raw_payload(text),
        }),
    }
}

/// Tag text after the kind token and one separator, spacing and newlines
/// untouched.
fn raw_payload(text: &str) -> String {
    let text = text.trim_start();
    let Some(end) = text.find(char::is_whitespace) else {
        return String::new();
    };
    let rest = &text[end..];
    let mut chars = rest.chars();
    chars.next();
    chars.as_str().trim_end().to_string()
}

fn take_type_token(parts: &mut Vec<String>) -> Option<String> {
    if parts.first().is_some_and(|first| RE_TYPE_TOKEN.is_match(first)) {
        Some(parts.remove(0))
    } else {
        None
    }
}

/// Split a tag's first line on whitespace outside `{}`.
fn extract_tag_parts(line: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth: usize = 0;

    for c in line.chars() {
        if c.is_whitespace() && depth == 0 {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
            continue;
        }
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        current.push(c);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Types declared in a `{...}` token, and whether the type marks the tag
/// optional (`{String=}`).
///
/// `{(String|Number)}` → `["String", "Number"]`, `{?Object}` → `["Object"]`.
fn parse_types(token: Option<&str>) -> (Vec<String>, bool) {
    let Some(token) = token else {
        return (Vec::new(), false);
    };
    let inner = token
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .unwrap_or(token)
        .trim();
    let optional = inner.ends_with('=');
    let mut types = Vec::new();
    collect_union(inner.trim_end_matches('='), &mut types);
    (types, optional)
}

fn collect_union(expr: &str, out: &mut Vec<String>) {
    let expr = expr.trim();
    let expr = expr.strip_prefix("...").unwrap_or(expr);
    let expr = expr
        .trim_start_matches(|c: char| matches!(c, '?' | '!'))
        .trim_end_matches(|c: char| matches!(c, '?' | '!' | '='))
        .trim();

    if let Some(inner) = strip_group(expr) {
        collect_union(inner, out);
        return;
    }

    let members = split_top_level(expr, '|');
    if members.len() == 1 {
        if !expr.is_empty() {
            out.push(expr.to_string());
        }
        return;
    }
    for member in members {
        collect_union(member, out);
    }
}

/// Inner text when `expr` is wrapped entirely in one pair of parens.
fn strip_group(expr: &str) -> Option<&str> {
    let inner = expr.strip_prefix('(')?.strip_suffix(')')?;
    let mut depth: i32 = 0;
    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    // `(A)|(B)`: the outer parens are not a pair
                    return None;
                }
            }
            _ => {}
        }
    }
    Some(inner)
}

fn split_top_level(expr: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;
    for (i, c) in expr.char_indices() {
        match c {
            '(' | '<' | '{' | '[' => depth += 1,
            ')' | '>' | '}' | ']' => depth -= 1,
            c if c == sep && depth == 0 => {
                parts.push(&expr[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&expr[start..]);
    parts
}
