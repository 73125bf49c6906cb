//! Parallel batch driver: one pipeline run per file.
//!
//! Files share nothing, so they are processed with rayon and collected back
//! in input order. Each file keeps its own result; one failing file does not
//! affect the others.

use crate::error::Result;
use crate::model::{DocEntry, TaggedComment};
use crate::parser::CommentParser;
use crate::{normalize, normalize_source};
use rayon::prelude::*;

/// What to normalize for one file.
#[derive(Debug, Clone)]
pub enum SourceInput {
    /// Raw source text, parsed first
    Text(String),
    /// Records produced by an external parser
    Records(Vec<TaggedComment>),
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Used to scope uids and in error messages
    pub name: String,
    pub input: SourceInput,
}

impl SourceFile {
    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input: SourceInput::Text(text.into()),
        }
    }

    pub fn records(name: impl Into<String>, records: Vec<TaggedComment>) -> Self {
        Self {
            name: name.into(),
            input: SourceInput::Records(records),
        }
    }
}

#[derive(Debug)]
pub struct FileResult {
    pub name: String,
    pub entries: Result<Vec<DocEntry>>,
}

/// Normalize every file, in parallel, preserving input order.
pub fn normalize_sources<P>(parser: &P, files: &[SourceFile]) -> Vec<FileResult>
where
    P: CommentParser + Sync + ?Sized,
{
    tracing::debug!(files = files.len(), "normalizing batch");
    files
        .par_iter()
        .map(|file| FileResult {
            name: file.name.clone(),
            entries: match &file.input {
                SourceInput::Text(text) => normalize_source(parser, text, &file.name),
                SourceInput::Records(records) => normalize(records, &file.name),
            },
        })
        .collect()
}
