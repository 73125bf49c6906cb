//! Parameter-name and identifier formatting.
//!
//! Every function here is total: any input produces some output.

use crate::model::NamedTag;

/// Bare parameter name from a declared name token.
///
/// `[sound=bark]` → `sound`, `options.timeout` → `options.timeout`
pub fn format_param(raw: &str) -> String {
    let stripped = strip_brackets(raw);
    match stripped.split_once('=') {
        Some((name, _)) => name.to_string(),
        None => stripped,
    }
}

/// Default value from a declared name token, if it carries one.
///
/// `[sound=bark]` → `Some("bark")`. Only the text between the first and
/// second `=` is kept.
pub fn format_default(raw: &str) -> Option<String> {
    strip_brackets(raw).split('=').nth(1).map(str::to_string)
}

fn strip_brackets(raw: &str) -> String {
    raw.chars().filter(|c| !matches!(c, '[' | ']')).collect()
}

/// Stable identifier for an entry, applied to `"{filename}-{name}"`.
///
/// - lowercase
/// - every run of chars other than `[a-z0-9_.]` becomes a single `-`
/// - no leading or trailing `-`
///
/// Hyphens in the input are not escaped, so `a--b` and `a b` collide.
pub fn format_uid(raw: &str) -> String {
    let mut uid = String::with_capacity(raw.len());
    let mut in_run = false;
    for c in raw.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
            uid.push(c);
            in_run = false;
        } else if !in_run {
            uid.push('-');
            in_run = true;
        }
    }
    uid.trim_matches('-').to_string()
}

/// Parameter signature from top-level params.
///
/// Optional params are bracketed individually, then adjacent groups merge:
/// `a`, `[b]`, `[c]` → `a, [b, c]`.
pub fn format_signature<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = &'a NamedTag>,
{
    let joined = params
        .into_iter()
        .map(|param| {
            let name = format_param(&param.name);
            if param.optional {
                format!("[{}]", name)
            } else {
                name
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
        .replace("], [", ", ");

    match joined.strip_prefix(", [") {
        Some(rest) => format!("[, {}", rest),
        None => joined,
    }
}
