//! doxnorm: emit normalized documentation JSON for JSDoc-annotated sources.
//!
//! Two modes:
//!
//! - **stdin mode**: `doxnorm --name index.js < index.js`
//! - **file mode**: `doxnorm -o docs/api src/*.js`

use anyhow::{bail, Context, Result};
use clap::Parser;
use doxnorm::batch::{self, SourceFile};
use doxnorm::model::{self, DocEntry};
use doxnorm::parser::{BlockParser, ParseOptions};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "doxnorm",
    about = "Normalize JSDoc comment blocks into documentation JSON"
)]
struct Cli {
    /// Input files (glob patterns and directories supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory; one `<stem>.json` per input file. Prints to stdout when omitted.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// File name used to build uids in stdin mode
    #[arg(short = 'n', long, default_value = "stdin.js")]
    name: String,

    /// Inputs are JSON arrays of dox-compatible comment records, not source text
    #[arg(long)]
    preparsed: bool,

    /// Also treat `/* */` blocks as documentation
    #[arg(long)]
    include_single_star: bool,

    /// Single-line JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

/// One file's entries in combined stdout output.
#[derive(Serialize)]
struct FileDoc<'a> {
    name: &'a str,
    methods: &'a [DocEntry],
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doxnorm=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let parser = BlockParser::new(ParseOptions {
        skip_single_star: !cli.include_single_star,
    });

    if cli.files.is_empty() {
        return stdin_mode(&cli, &parser);
    }

    file_mode(&cli, &parser)
}

/// stdin mode: read one file from stdin, print its entries.
fn stdin_mode(cli: &Cli, parser: &BlockParser) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let file = source_file(cli.name.clone(), input, cli.preparsed)?;
    let result = batch::normalize_sources(parser, &[file])
        .pop()
        .context("no result for stdin")?;
    let entries = result
        .entries
        .with_context(|| format!("failed to normalize {}", result.name))?;

    println!("{}", to_json(&entries, cli.compact)?);
    Ok(())
}

/// file mode: normalize every input, write per-file JSON or one combined document.
fn file_mode(cli: &Cli, parser: &BlockParser) -> Result<()> {
    let extensions = if cli.preparsed {
        PREPARSED_EXTENSIONS
    } else {
        SOURCE_EXTENSIONS
    };
    let input_files = expand_globs(&cli.files, extensions)?;

    let mut sources = Vec::with_capacity(input_files.len());
    for path in &input_files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        sources.push(source_file(
            path.to_string_lossy().to_string(),
            content,
            cli.preparsed,
        )?);
    }

    let mut documents: Vec<(String, Vec<DocEntry>)> = Vec::new();
    for result in batch::normalize_sources(parser, &sources) {
        let entries = result
            .entries
            .with_context(|| format!("failed to normalize {}", result.name))?;
        documents.push((result.name, entries));
    }

    match cli.output.as_deref() {
        Some(output_dir) => write_documents(output_dir, &documents, cli.compact),
        None => {
            let combined: Vec<FileDoc<'_>> = documents
                .iter()
                .map(|(name, entries)| FileDoc {
                    name,
                    methods: entries,
                })
                .collect();
            println!("{}", to_json(&combined, cli.compact)?);
            Ok(())
        }
    }
}

fn source_file(name: String, content: String, preparsed: bool) -> Result<SourceFile> {
    if preparsed {
        let records = model::records_from_json(&content)
            .with_context(|| format!("invalid comment records in {}", name))?;
        Ok(SourceFile::records(name, records))
    } else {
        Ok(SourceFile::text(name, content))
    }
}

fn write_documents(output_dir: &Path, documents: &[(String, Vec<DocEntry>)], compact: bool) -> Result<()> {
    let planned = plan_outputs(output_dir, documents)?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    for (out_path, entries) in planned {
        fs::write(&out_path, to_json(entries, compact)?)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
    }
    Ok(())
}

/// Output path for every non-empty document. Two sources that map to the
/// same `<stem>.json` are an error; nothing is written in that case.
fn plan_outputs<'a>(
    output_dir: &Path,
    documents: &'a [(String, Vec<DocEntry>)],
) -> Result<Vec<(PathBuf, &'a [DocEntry])>> {
    let mut claimed: HashMap<PathBuf, &str> = HashMap::new();
    let mut planned = Vec::with_capacity(documents.len());

    for (source, entries) in documents {
        if entries.is_empty() {
            tracing::warn!(file = %source, "no documented entries, skipping");
            continue;
        }
        let out_path = output_dir.join(format!("{}.json", derive_output_name(source)));
        if let Some(previous) = claimed.insert(out_path.clone(), source) {
            bail!(
                "{} and {} both write {}",
                previous,
                source,
                out_path.display()
            );
        }
        planned.push((out_path, entries.as_slice()));
    }
    Ok(planned)
}

fn to_json<T: Serialize + ?Sized>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}

/// File extensions recognized as source files.
const SOURCE_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "jsx", "ts"];

/// File extensions recognized as preparsed record files.
const PREPARSED_EXTENSIONS: &[&str] = &["json"];

/// Resolve inputs to a sorted, deduplicated file list.
///
/// An existing file is taken as given. Directories (non-recursive) and glob
/// matches only contribute files with one of `extensions`.
fn expand_globs(patterns: &[String], extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }

        let candidates: Vec<PathBuf> = if path.is_dir() {
            fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?
                .flatten()
                .map(|entry| entry.path())
                .collect()
        } else {
            glob::glob(pattern)
                .with_context(|| format!("invalid glob pattern: {}", pattern))?
                .filter_map(|r| r.ok())
                .collect()
        };

        let before = files.len();
        files.extend(
            candidates
                .into_iter()
                .filter(|p| p.is_file() && has_extension(p, extensions)),
        );
        if files.len() == before {
            tracing::warn!(pattern = %pattern, "no files matched");
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.contains(&ext))
}

/// Derive the output file name (without extension) from a source path.
/// "src/animal.js" → "animal", "records/animal.json" → "animal"
fn derive_output_name(source: &str) -> String {
    Path::new(source)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| source.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use doxnorm::parser::CommentParser;

    #[test]
    fn output_name_from_js() {
        assert_eq!(derive_output_name("src/animal.js"), "animal");
        assert_eq!(derive_output_name("animal.js"), "animal");
    }

    #[test]
    fn output_name_from_records() {
        assert_eq!(derive_output_name("records/animal.json"), "animal");
    }

    #[test]
    fn output_name_no_extension() {
        assert_eq!(derive_output_name("Makefile"), "Makefile");
    }

    #[test]
    fn colliding_output_names_are_rejected() {
        let entries = doxnorm::normalize(
            &BlockParser::default().parse("/** Hi. */\nfunction hi() {}\n"),
            "index.js",
        )
        .unwrap();
        let documents = vec![
            ("a/index.js".to_string(), entries.clone()),
            ("b/index.ts".to_string(), entries.clone()),
        ];

        let err = plan_outputs(Path::new("out"), &documents).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("a/index.js"));
        assert!(message.contains("b/index.ts"));
    }

    #[test]
    fn empty_documents_do_not_claim_outputs() {
        let entries = doxnorm::normalize(
            &BlockParser::default().parse("/** Hi. */\nfunction hi() {}\n"),
            "index.js",
        )
        .unwrap();
        let documents = vec![
            ("a/index.js".to_string(), Vec::new()),
            ("b/index.js".to_string(), entries),
        ];

        let planned = plan_outputs(Path::new("out"), &documents).unwrap();
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].0, Path::new("out").join("index.json"));
    }

    #[test]
    fn extension_filter() {
        assert!(has_extension(Path::new("src/a.mjs"), SOURCE_EXTENSIONS));
        assert!(!has_extension(Path::new("src/a.json"), SOURCE_EXTENSIONS));
        assert!(!has_extension(Path::new("Makefile"), PREPARSED_EXTENSIONS));
    }

    #[test]
    fn preparsed_source_file() {
        let file = source_file("a.json".to_string(), "[]".to_string(), true).unwrap();
        assert!(matches!(file.input, batch::SourceInput::Records(ref r) if r.is_empty()));
        assert!(source_file("a.json".to_string(), "{".to_string(), true).is_err());
    }

    #[test]
    fn compact_json_is_single_line() {
        let parser = BlockParser::default();
        let records = parser.parse("/** Hi. */\nfunction hi() {}\n");
        let entries = doxnorm::normalize(&records, "hi.js").unwrap();
        assert!(!to_json(&entries, true).unwrap().contains('\n'));
        assert!(to_json(&entries, false).unwrap().contains('\n'));
    }
}
