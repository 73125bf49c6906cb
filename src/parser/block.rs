//! Block scanner: splits source text into comment blocks and the code that
//! follows each one.
//!
//! Character state machine that tracks line comments and string literals so
//! that `/**` inside them does not open a block.

use super::ParseOptions;
use regex::Regex;
use std::sync::LazyLock;

/// `* ` gutter at the start of each block line.
static RE_GUTTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\* ?").unwrap());

/// A block comment with its gutters stripped.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct RawBlock {
    pub body: String,
    /// Opened with `/*!`
    pub ignore: bool,
    /// 1-based line of the opening delimiter
    pub line: usize,
    /// Trimmed source text up to the next block
    pub code: String,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    LineComment,
    /// `/* */` comment that is not documentation
    PlainComment,
    Str(char),
    Block,
}

/// Scan `source` for documentation blocks.
pub(crate) fn scan(source: &str, options: &ParseOptions) -> Vec<RawBlock> {
    let chars: Vec<char> = source.chars().collect();
    let mut blocks: Vec<RawBlock> = Vec::new();
    let mut buf = String::new();
    let mut state = State::Code;
    let mut line = 1;
    let mut block_line = 1;
    let mut ignore = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        match state {
            State::Code => {
                if opens_block(&chars, i, options) {
                    // Code since the previous block belongs to it
                    if let Some(last) = blocks.last_mut() {
                        last.code = buf.trim().to_string();
                    }
                    buf.clear();
                    block_line = line;
                    ignore = next_is(&chars, i + 2, '!');
                    i += if ignore { 3 } else { 2 };
                    state = State::Block;
                    continue;
                }
                if c == '/' && next == Some('/') {
                    state = State::LineComment;
                } else if c == '/' && next == Some('*') {
                    buf.push_str("/*");
                    state = State::PlainComment;
                    i += 2;
                    continue;
                } else if matches!(c, '\'' | '"' | '`') {
                    state = State::Str(c);
                }
                buf.push(c);
            }
            State::LineComment => {
                if c == '\n' {
                    state = State::Code;
                }
                buf.push(c);
            }
            State::PlainComment => {
                if c == '*' && next == Some('/') {
                    buf.push_str("*/");
                    state = State::Code;
                    i += 2;
                    continue;
                }
                buf.push(c);
            }
            State::Str(quote) => {
                buf.push(c);
                if c == '\\' {
                    if let Some(escaped) = next {
                        buf.push(escaped);
                        if escaped == '\n' {
                            line += 1;
                        }
                        i += 2;
                        continue;
                    }
                } else if c == quote || (c == '\n' && quote != '`') {
                    state = State::Code;
                }
            }
            State::Block => {
                if c == '*' && next == Some('/') {
                    blocks.push(RawBlock {
                        body: strip_gutters(&buf),
                        ignore,
                        line: block_line,
                        code: String::new(),
                    });
                    buf.clear();
                    ignore = false;
                    state = State::Code;
                    i += 2;
                    continue;
                }
                buf.push(c);
            }
        }

        if c == '\n' {
            line += 1;
        }
        i += 1;
    }

    if let Some(last) = blocks.last_mut() {
        if state != State::Block {
            last.code = buf.trim().to_string();
        }
    }
    tracing::trace!(blocks = blocks.len(), "scanned comment blocks");
    blocks
}

fn next_is(chars: &[char], i: usize, expected: char) -> bool {
    chars.get(i) == Some(&expected)
}

/// `/**` always opens a block; `/*` only when single-star blocks are
/// enabled. `/**/` is an empty comment, not a block.
fn opens_block(chars: &[char], i: usize, options: &ParseOptions) -> bool {
    if !(next_is(chars, i, '/') && next_is(chars, i + 1, '*')) {
        return false;
    }
    if next_is(chars, i + 2, '*') {
        return !next_is(chars, i + 3, '/');
    }
    !options.skip_single_star
}

fn strip_gutters(raw: &str) -> String {
    RE_GUTTER.replace_all(raw, "").trim().to_string()
}
