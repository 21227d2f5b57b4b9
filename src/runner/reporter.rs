use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Which command produced a run; decides how the summary is worded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    Check,
    Format,
    FormatCheck,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Passed,
    Changed,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<String>,
}

impl FileResult {
    pub fn passed(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            status: Status::Passed,
            error: None,
            span: None,
        }
    }

    pub fn changed(file: impl Into<String>) -> Self {
        Self {
            status: Status::Changed,
            ..Self::passed(file)
        }
    }

    pub fn failed(file: impl Into<String>, error: &anyhow::Error) -> Self {
        let span = error
            .downcast_ref::<crate::parser::ElementError>()
            .and_then(|error| error.span())
            .map(str::to_string);

        Self {
            file: file.into(),
            status: Status::Failed,
            error: Some(format!("{:#}", error)),
            span,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub files: usize,
    pub passed: usize,
    pub changed: usize,
    pub failed: usize,
    #[serde(skip)]
    pub duration_ms: u64,
}

impl Summary {
    pub fn from_results(files: &[FileResult], duration_ms: u64) -> Self {
        let count = |status: Status| files.iter().filter(|f| f.status == status).count();
        Self {
            files: files.len(),
            passed: count(Status::Passed),
            changed: count(Status::Changed),
            failed: count(Status::Failed),
            duration_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunOutput {
    pub mode: Mode,
    pub files: Vec<FileResult>,
    pub summary: Summary,
}

impl RunOutput {
    /// Whether the run should exit non-zero. Files that would be rewritten
    /// only count under `fmt --check`.
    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0 || (self.mode == Mode::FormatCheck && self.summary.changed > 0)
    }
}

#[derive(Debug, Clone, Serialize)]
struct Report<'a> {
    tool: Tool,
    #[serde(flatten)]
    output: &'a RunOutput,
}

#[derive(Debug, Clone, Serialize)]
struct Tool {
    name: &'static str,
    version: &'static str,
}

pub trait OutputFormatter {
    fn format(&self, output: &RunOutput) -> String;
}

pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format(&self, output: &RunOutput) -> String {
        let report = Report {
            tool: Tool {
                name: "poshi",
                version: env!("CARGO_PKG_VERSION"),
            },
            output,
        };

        serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
            let escaped = serde_json::to_string(&e.to_string())
                .unwrap_or_else(|_| "\"serialization error\"".to_string());
            format!("{{\"error\": {}}}", escaped)
        })
    }
}

pub struct TextFormatter;

fn plural(count: usize) -> &'static str {
    if count == 1 {
        "file"
    } else {
        "files"
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, output: &RunOutput) -> String {
        let summary = &output.summary;
        let duration_secs = summary.duration_ms as f64 / 1000.0;

        if summary.failed > 0 {
            return format!(
                "{} {}/{} {} had syntax errors",
                "✗".red(),
                summary.failed,
                summary.files,
                plural(summary.files)
            );
        }

        match output.mode {
            Mode::Check => format!(
                "{} Checked {} {} in {:.2}s",
                "✓".green(),
                summary.files,
                plural(summary.files),
                duration_secs
            ),
            Mode::Format => format!(
                "{} Formatted {} {}, {} unchanged in {:.2}s",
                "✓".green(),
                summary.changed,
                plural(summary.changed),
                summary.passed,
                duration_secs
            ),
            Mode::FormatCheck if summary.changed > 0 => format!(
                "{} {} {} would be reformatted",
                "✗".red(),
                summary.changed,
                plural(summary.changed)
            ),
            Mode::FormatCheck => format!(
                "{} {} {} already formatted",
                "✓".green(),
                summary.files,
                plural(summary.files)
            ),
        }
    }
}

pub trait Reporter {
    fn on_warning(&self, message: &str);
    fn on_result(&self, result: &FileResult, mode: Mode);
}

/// Streams per-file lines as they are produced. Silent in JSON mode, where
/// only the final report is printed.
pub struct DefaultReporter {
    output_format: OutputFormat,
}

impl DefaultReporter {
    pub fn new(output_format: OutputFormat) -> Self {
        Self { output_format }
    }

    fn is_json(&self) -> bool {
        self.output_format == OutputFormat::Json
    }
}

impl Reporter for DefaultReporter {
    fn on_warning(&self, message: &str) {
        if self.is_json() {
            return;
        }
        eprintln!("{} {}", "Warning:".yellow(), message);
    }

    fn on_result(&self, result: &FileResult, mode: Mode) {
        if self.is_json() {
            return;
        }

        match (result.status, mode) {
            (Status::Failed, _) => print_failure(result),
            (Status::Changed, Mode::FormatCheck) => {
                println!("{} {}", "Would reformat:".yellow(), result.file.dimmed())
            }
            (Status::Changed, _) => println!("{} {}", "Formatted:".green(), result.file.dimmed()),
            (Status::Passed, _) => {}
        }
    }
}

pub fn print_failure(result: &FileResult) {
    println!();
    println!("{} {}", "FAIL".red(), result.file.dimmed());

    if let Some(ref error) = result.error {
        println!("{} {}", "Error:".red(), error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ElementError;

    fn make_output(mode: Mode, statuses: &[Status]) -> RunOutput {
        let files: Vec<_> = statuses
            .iter()
            .enumerate()
            .map(|(i, &status)| FileResult {
                status,
                ..FileResult::passed(format!("file{}.testcase", i))
            })
            .collect();
        let summary = Summary::from_results(&files, 0);
        RunOutput {
            mode,
            files,
            summary,
        }
    }

    #[test]
    fn test_summary_counts() {
        let output = make_output(
            Mode::Format,
            &[Status::Passed, Status::Changed, Status::Changed, Status::Failed],
        );
        assert_eq!(output.summary.files, 4);
        assert_eq!(output.summary.passed, 1);
        assert_eq!(output.summary.changed, 2);
        assert_eq!(output.summary.failed, 1);
    }

    #[test]
    fn test_has_failures_all_passing() {
        let output = make_output(Mode::Check, &[Status::Passed, Status::Passed]);
        assert!(!output.has_failures());
    }

    #[test]
    fn test_has_failures_with_failed_files() {
        let output = make_output(Mode::Check, &[Status::Passed, Status::Failed]);
        assert!(output.has_failures());
    }

    #[test]
    fn test_changes_only_fail_format_check() {
        assert!(!make_output(Mode::Format, &[Status::Changed]).has_failures());
        assert!(make_output(Mode::FormatCheck, &[Status::Changed]).has_failures());
    }

    #[test]
    fn test_has_failures_empty_run() {
        assert!(!make_output(Mode::Check, &[]).has_failures());
    }

    #[test]
    fn test_failed_result_keeps_span() {
        let error = anyhow::Error::new(ElementError::UnbalancedSyntax {
            span: "Click(".to_string(),
        });
        let result = FileResult::failed("a.testcase", &error);
        assert_eq!(result.status, Status::Failed);
        assert_eq!(result.span.as_deref(), Some("Click("));
        assert_eq!(result.error.as_deref(), Some("Unbalanced syntax: Click("));
    }

    #[test]
    fn test_json_report_shape() {
        let output = make_output(Mode::Check, &[Status::Passed]);
        let json = JsonFormatter.format(&output);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["tool"]["name"], "poshi");
        assert_eq!(value["mode"], "check");
        assert_eq!(value["summary"]["files"], 1);
        assert_eq!(value["files"][0]["status"], "passed");
        assert!(value["files"][0].get("error").is_none());
    }

    #[test]
    fn test_text_summary_mentions_failures() {
        let output = make_output(Mode::Check, &[Status::Failed, Status::Passed]);
        let text = TextFormatter.format(&output);
        assert!(text.contains("1/2 files had syntax errors"));
    }

    #[test]
    fn test_text_summary_format_check() {
        let output = make_output(Mode::FormatCheck, &[Status::Changed]);
        assert!(TextFormatter.format(&output).contains("1 file would be reformatted"));
    }
}
