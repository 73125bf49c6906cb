//! Comment parser: source text to tagged comment records.
//!
//! Configuration is carried by the parser value and handed to each stage at
//! call time; nothing here keeps global state.

mod block;
mod context;
mod tags;

use crate::model::{CodeContext, ContextKind, TaggedComment};

/// Anything that can turn source text into tagged comment records.
pub trait CommentParser {
    fn parse(&self, source: &str) -> Vec<TaggedComment>;
}

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Only `/** */` blocks are documentation; `/* */` blocks are code.
    pub skip_single_star: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            skip_single_star: true,
        }
    }
}

/// dox-style parser for `/** */` blocks in JavaScript-like sources.
///
/// Descriptions are kept raw; no markdown is rendered.
#[derive(Debug, Clone, Default)]
pub struct BlockParser {
    options: ParseOptions,
}

impl BlockParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }
}

impl CommentParser for BlockParser {
    fn parse(&self, source: &str) -> Vec<TaggedComment> {
        let mut parent: Option<CodeContext> = None;

        block::scan(source, &self.options)
            .into_iter()
            .map(|block| {
                let mut comment = tags::parse_comment(&block.body);
                comment.ignore = block.ignore;
                comment.line = block.line;
                comment.ctx = context::parse_context(&block.code, parent.as_ref());
                comment.code = block.code;

                if let Some(ctx) = &comment.ctx {
                    match ctx.kind {
                        ContextKind::Class => comment.is_class = true,
                        ContextKind::Constructor => comment.is_constructor = true,
                        _ => {}
                    }
                    match ctx.kind {
                        ContextKind::Class | ContextKind::Prototype => parent = Some(ctx.clone()),
                        ContextKind::Function | ContextKind::Declaration => parent = None,
                        _ => {}
                    }
                }
                comment
            })
            .collect()
    }
}
