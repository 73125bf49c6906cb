//! doxnorm: normalize JSDoc-style comment blocks into a stable
//! documentation model.
//!
//! The pipeline has two stages:
//!
//! 1. a [`CommentParser`](parser::CommentParser) turns source text into
//!    tagged comment records (see [`parser::BlockParser`])
//! 2. [`normalize`] reshapes those records into [`DocEntry`](model::DocEntry)
//!    values: one class entry (class merged with its constructor) followed by
//!    member entries
//!
//! Both stages are pure; [`batch`] runs them over many files in parallel.

pub mod batch;
pub mod error;
pub mod format;
pub mod model;
pub mod normalize;
pub mod parser;

pub use error::{Error, Result};
pub use normalize::normalize;

use model::DocEntry;
use parser::CommentParser;

/// Parse `source` with `parser` and normalize the result.
pub fn normalize_source<P>(parser: &P, source: &str, filename: &str) -> Result<Vec<DocEntry>>
where
    P: CommentParser + ?Sized,
{
    normalize(&parser.parse(source), filename)
}
