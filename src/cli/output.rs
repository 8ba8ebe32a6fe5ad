use crate::Report;
use colored::*;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonFile<'a> {
    file: String,
    #[serde(flatten)]
    report: &'a Report,
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    files_checked: usize,
    files_with_errors: usize,
    files_with_warnings: usize,
    files: Vec<JsonFile<'a>>,
}

pub fn print_checking(file_path: &Path) {
    println!("Checking file: \"{}\"...", file_path.display());
}

/// `Error: <file>: w1, w2`
pub fn error_line(file_path: &Path, words: &[String], colored_output: bool) -> String {
    let label = if colored_output {
        "Error:".red().bold().to_string()
    } else {
        "Error:".to_string()
    };
    format!("{} {}: {}", label, file_path.display(), join_words(words, colored_output))
}

/// `Warning: <file>: w1, w2`
pub fn warning_line(file_path: &Path, words: &[String], colored_output: bool) -> String {
    let label = if colored_output {
        "Warning:".yellow().bold().to_string()
    } else {
        "Warning:".to_string()
    };
    format!("{} {}: {}", label, file_path.display(), join_words(words, colored_output))
}

fn join_words(words: &[String], colored_output: bool) -> String {
    if colored_output {
        words
            .iter()
            .map(|w| w.bold().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        words.join(", ")
    }
}

pub fn summary_line(error_files: usize, warning_files: usize) -> String {
    format!(
        "Check complete; there were {} errors and {} warnings.",
        error_files, warning_files
    )
}

pub fn print_summary(error_files: usize, warning_files: usize, colored_output: bool) {
    if error_files > 0 || warning_files > 0 {
        println!();
    }

    let line = summary_line(error_files, warning_files);
    if !colored_output {
        println!("{}", line);
    } else if error_files > 0 {
        println!("{}", line.red().bold());
    } else if warning_files > 0 {
        println!("{}", line.yellow());
    } else {
        println!("{}", line.green().bold());
    }
}

pub fn print_json(results: &[(String, Report)]) -> serde_json::Result<()> {
    let output = JsonOutput {
        files_checked: results.len(),
        files_with_errors: results
            .iter()
            .filter(|(_, r)| !r.error_words.is_empty())
            .count(),
        files_with_warnings: results
            .iter()
            .filter(|(_, r)| !r.warning_words.is_empty())
            .count(),
        files: results
            .iter()
            .map(|(file, report)| JsonFile {
                file: file.clone(),
                report,
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
