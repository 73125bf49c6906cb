//! Comment model normalizer: tagged comment records → documentation entries.
//!
//! The class record and the constructor record of a file are merged into a
//! single class entry placed first; every other documented record becomes a
//! member entry in source order.

use crate::error::{Error, Result};
use crate::format::{format_default, format_param, format_signature, format_uid};
use crate::model::*;
use std::collections::HashMap;

/// A record that survived filtering, paired with its resolved context.
#[derive(Clone, Copy)]
struct Documented<'a> {
    record: &'a TaggedComment,
    ctx: &'a CodeContext,
}

/// Normalize the records parsed from one file.
///
/// `filename` scopes every uid and is named in the error when a constructor
/// record has no class record.
pub fn normalize(records: &[TaggedComment], filename: &str) -> Result<Vec<DocEntry>> {
    let documented: Vec<Documented<'_>> = records
        .iter()
        .filter(|record| !record.ignore)
        .filter_map(|record| record.context().map(|ctx| Documented { record, ctx }))
        .collect();

    // First match wins. The parser does not promise a single class or
    // constructor block per file; later ones fall through to members.
    let class_idx = documented.iter().position(|doc| doc.record.is_class);
    let ctor_idx = documented.iter().position(|doc| doc.record.is_constructor);

    let class_entry = match (class_idx, ctor_idx) {
        (None, Some(_)) => {
            return Err(Error::MissingClass {
                filename: filename.to_string(),
            })
        }
        (Some(cls), ctor) => Some(build_class(
            documented[cls],
            ctor.map(|i| documented[i].record),
            filename,
        )),
        (None, None) => None,
    };

    let mut entries: Vec<DocEntry> = class_entry.map(DocEntry::Class).into_iter().collect();

    for (i, doc) in documented.iter().enumerate() {
        if Some(i) == class_idx || Some(i) == ctor_idx {
            continue;
        }
        if is_empty(doc.record) {
            tracing::debug!(filename, name = %doc.ctx.name, "dropping empty comment");
            continue;
        }
        entries.push(DocEntry::Member(build_member(*doc, filename)));
    }

    tracing::debug!(
        filename,
        records = records.len(),
        entries = entries.len(),
        "normalized comments"
    );
    Ok(entries)
}

fn uid(filename: &str, name: &str) -> String {
    format_uid(&format!("{}-{}", filename, name))
}

fn is_empty(record: &TaggedComment) -> bool {
    record.description.full.is_empty() && record.tags.is_empty()
}

// -- Class entry ---------------------------------------------------------------

fn build_class(cls: Documented<'_>, ctor: Option<&TaggedComment>, filename: &str) -> ClassEntry {
    let name = cls.ctx.name.clone();
    let record = cls.record;

    let extends = record.tags.iter().find_map(|tag| match tag {
        Tag::Extends(ext) if ext.kind == ExtendsKind::Extends => Some(ext.other_class.clone()),
        _ => None,
    });

    let (display, params) = match ctor {
        Some(ctor) => (
            Some(format!("{}({})", name, format_signature(ctor.top_level_params()))),
            Some(constructor_params(ctor)),
        ),
        None => (None, None),
    };

    ClassEntry {
        uid: uid(filename, &name),
        is_abstract: record.tags.iter().any(|tag| matches!(tag, Tag::Abstract)),
        kind: ContextKind::Class,
        name,
        description: record.description.full.clone(),
        props: property_entries(&record.tags),
        extends: extends.flatten(),
        display,
        params,
    }
}

/// Top-level constructor params, with dot-notation children attached to
/// `object`-typed params as `props`.
fn constructor_params(ctor: &TaggedComment) -> Vec<ParamEntry> {
    // parent name → children, keyed on the exact text before the first dot
    let mut children: HashMap<String, Vec<(String, &NamedTag)>> = HashMap::new();
    for tag in ctor.params().filter(|param| param.is_dotted()) {
        let formatted = format_param(&tag.name);
        if let Some((parent, child)) = formatted.split_once('.') {
            children
                .entry(parent.to_string())
                .or_default()
                .push((child.to_string(), tag));
        }
    }

    ctor.top_level_params()
        .map(|tag| {
            let mut entry = param_entry(tag, format_param(&tag.name));
            if tag.is_object() {
                let props = children
                    .get(&entry.name)
                    .map(|kids| {
                        kids.iter()
                            .map(|(child, kid)| param_entry(kid, child.clone()))
                            .collect()
                    })
                    .unwrap_or_default();
                entry.props = Some(props);
            }
            entry
        })
        .collect()
}

fn param_entry(tag: &NamedTag, name: String) -> ParamEntry {
    ParamEntry {
        name,
        is_optional: tag.optional,
        types: tag.types.clone(),
        description: tag.description.clone(),
        default: if tag.optional {
            format_default(&tag.name)
        } else {
            None
        },
        props: None,
    }
}

fn property_entries(tags: &[Tag]) -> Vec<PropertyEntry> {
    tags.iter()
        .filter_map(|tag| match tag {
            Tag::Property(prop) => Some(PropertyEntry {
                name: prop.name.clone(),
                types: prop.types.clone(),
                description: prop.description.clone(),
            }),
            _ => None,
        })
        .collect()
}

// -- Member entries ------------------------------------------------------------

fn build_member(doc: Documented<'_>, filename: &str) -> MemberEntry {
    let record = doc.record;
    let mut tags = MemberTags {
        property: property_entries(&record.tags),
        ..Default::default()
    };

    for tag in &record.tags {
        match tag {
            Tag::Example(text) => tags.example.push(text.clone()),
            Tag::Param(param) => tags.param.push(ParamEntry {
                name: format_param(&param.name),
                is_optional: param.optional,
                types: param.types.clone(),
                description: param.description.clone(),
                default: None,
                props: None,
            }),
            Tag::Extends(ext) => tags.extends.push(ExtendsEntry {
                kind: ext.kind,
                class: ext.other_class.clone(),
            }),
            Tag::Return(ret) => tags.returns.push(ReturnEntry {
                types: ret.types.clone(),
                description: ret.description.clone(),
            }),
            Tag::Property(_) | Tag::Abstract | Tag::Other(_) => {}
        }
    }

    MemberEntry {
        uid: uid(filename, &doc.ctx.name),
        is_private: record.is_private,
        kind: doc.ctx.kind.clone(),
        name: doc.ctx.name.clone(),
        description: record.description.full.clone(),
        params: format_signature(record.top_level_params()),
        tags,
    }
}
