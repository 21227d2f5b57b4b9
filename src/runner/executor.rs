use crate::config::Config;
use crate::elements::Document;
use crate::factory::ElementFactory;
use crate::runner::files::resolve_patterns;
use crate::runner::reporter::{
    DefaultReporter, FileResult, JsonFormatter, Mode, OutputFormat, OutputFormatter, Reporter,
    RunOutput, Summary, TextFormatter,
};
use crate::source::SourceNode;
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct RunnerOptions {
    pub config: Config,
    pub output_format: OutputFormat,
}

/// Direction of a `convert` run.
#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum Target {
    /// Structured JSON to readable syntax
    Readable,
    /// Readable syntax to structured JSON
    Source,
}

impl Target {
    /// `.json` files hold structured source; anything else is readable.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Target::Readable,
            _ => Target::Source,
        }
    }
}

struct ParsedFile {
    file: String,
    content: String,
    document: anyhow::Result<Document>,
}

/// Parses every matching file and reports syntax errors.
pub async fn run_check(patterns: Vec<String>, options: RunnerOptions) -> anyhow::Result<RunOutput> {
    run(patterns, &options, Mode::Check).await
}

/// Rewrites every matching file into canonical readable syntax. With
/// `check`, files are left untouched and only reported.
pub async fn run_format(
    patterns: Vec<String>,
    options: RunnerOptions,
    check: bool,
) -> anyhow::Result<RunOutput> {
    let mode = if check { Mode::FormatCheck } else { Mode::Format };
    run(patterns, &options, mode).await
}

async fn run(patterns: Vec<String>, options: &RunnerOptions, mode: Mode) -> anyhow::Result<RunOutput> {
    let reporter = DefaultReporter::new(options.output_format);
    let start_time = Instant::now();

    let all_files = resolve_patterns(&patterns, &options.config.extensions).await?;
    if all_files.is_empty() {
        reporter.on_warning(&format!("No files found matching: {}", patterns.join(", ")));
    }
    tracing::debug!("Resolved {} files", all_files.len());

    let factory = ElementFactory::standard();
    let parse_futures: Vec<_> = all_files
        .iter()
        .map(|file| parse_file(file, &factory))
        .collect();
    let parsed = futures::future::join_all(parse_futures).await;

    let mut results = Vec::with_capacity(parsed.len());
    for parsed_file in parsed {
        let result = match mode {
            Mode::Check => check_result(parsed_file),
            Mode::Format | Mode::FormatCheck => {
                format_result(parsed_file, &options.config, mode == Mode::Format).await
            }
        };
        reporter.on_result(&result, mode);
        results.push(result);
    }

    let summary = Summary::from_results(&results, start_time.elapsed().as_millis() as u64);
    let output = RunOutput {
        mode,
        files: results,
        summary,
    };

    match options.output_format {
        OutputFormat::Json => println!("{}", JsonFormatter.format(&output)),
        OutputFormat::Text => {
            println!();
            println!("{}", TextFormatter.format(&output));
        }
    }

    Ok(output)
}

async fn parse_file(file: &str, factory: &ElementFactory) -> ParsedFile {
    let content = match tokio::fs::read_to_string(file).await {
        Ok(content) => content,
        Err(e) => {
            return ParsedFile {
                file: file.to_string(),
                content: String::new(),
                document: Err(anyhow::Error::new(e).context(format!("Failed to read {}", file))),
            }
        }
    };

    let document = Document::from_readable_syntax(&content, factory).map_err(anyhow::Error::new);
    ParsedFile {
        file: file.to_string(),
        content,
        document,
    }
}

fn check_result(parsed: ParsedFile) -> FileResult {
    match parsed.document {
        Ok(_) => FileResult::passed(parsed.file),
        Err(e) => FileResult::failed(parsed.file, &e),
    }
}

/// A failed write is reported against its file; the rest of the run goes on.
async fn format_result(parsed: ParsedFile, config: &Config, write: bool) -> FileResult {
    let mut document = match parsed.document {
        Ok(document) => document,
        Err(e) => return FileResult::failed(parsed.file, &e),
    };
    document.set_indent(config.indent.as_str());

    let formatted = document.to_readable_syntax();
    if formatted == parsed.content {
        return FileResult::passed(parsed.file);
    }

    if write {
        let written = tokio::fs::write(&parsed.file, formatted)
            .await
            .with_context(|| format!("Failed to write {}", parsed.file));
        if let Err(e) = written {
            tracing::warn!("{:#}", e);
            return FileResult::failed(parsed.file, &e);
        }
    }
    FileResult::changed(parsed.file)
}

/// Converts one file between readable syntax and structured JSON. Writes to
/// `output` when given and returns the converted text either way.
pub async fn convert_file(
    input: &Path,
    target: Option<Target>,
    output: Option<PathBuf>,
    config: &Config,
) -> anyhow::Result<String> {
    let content = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let target = target.unwrap_or_else(|| Target::for_path(input));
    tracing::debug!("Converting {} to {:?}", input.display(), target);

    let converted = convert(&content, target, config)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    if let Some(path) = output {
        tokio::fs::write(&path, &converted)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(converted)
}

pub fn convert(content: &str, target: Target, config: &Config) -> anyhow::Result<String> {
    let factory = ElementFactory::standard();

    match target {
        Target::Readable => {
            let source: SourceNode =
                serde_json::from_str(content).context("Invalid structured source")?;
            let mut document = Document::from_source(&source, &factory)?;
            document.set_indent(config.indent.as_str());
            Ok(document.to_readable_syntax())
        }
        Target::Source => {
            let document = Document::from_readable_syntax(content, &factory)?;
            let root = document.root().context("Document has no root element")?;
            let mut json = serde_json::to_string_pretty(&document.to_source(root))?;
            json.push('\n');
            Ok(json)
        }
    }
}
