// SPDX-License-Identifier: MIT

//! Transcript parsing shared by every adapter variant: a small internal
//! JSONL format, one `{type, usage:{input_tokens,output_tokens}, model}`
//! record per line (spec.md §4.2's "normalized transcript formats").
//! Malformed lines are skipped, never fatal.

use crate::adapter::TranscriptSummary;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, serde::Deserialize)]
struct TranscriptLine {
    #[serde(rename = "type")]
    #[allow(dead_code)]
    line_type: Option<String>,
    usage: Option<Usage>,
    model: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

/// Parse a transcript file, summing token usage across every well-formed
/// line and taking the last seen `model` field. Returns `None` when the file
/// does not exist or no line parses.
pub fn parse_jsonl_transcript(path: &Path) -> Option<TranscriptSummary> {
    let file = File::open(path).ok()?;
    let reader = BufReader::new(file);

    let mut input_tokens = 0u64;
    let mut output_tokens = 0u64;
    let mut model = None;
    let mut saw_any = false;

    for line in reader.lines() {
        let Ok(line) = line else { continue };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<TranscriptLine>(&line) {
            Ok(parsed) => {
                saw_any = true;
                if let Some(usage) = parsed.usage {
                    input_tokens += usage.input_tokens;
                    output_tokens += usage.output_tokens;
                }
                if let Some(m) = parsed.model {
                    model = Some(m);
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unparseable transcript line");
            }
        }
    }

    if !saw_any {
        return None;
    }
    Some(TranscriptSummary { input_tokens, output_tokens, model: model.unwrap_or_default() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn sums_usage_across_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"type":"assistant","usage":{{"input_tokens":10,"output_tokens":5}},"model":"fast-1"}}"#).unwrap();
        writeln!(file, r#"{{"type":"assistant","usage":{{"input_tokens":20,"output_tokens":8}},"model":"fast-1"}}"#).unwrap();
        let summary = parse_jsonl_transcript(file.path()).unwrap();
        assert_eq!(summary.input_tokens, 30);
        assert_eq!(summary.output_tokens, 13);
        assert_eq!(summary.model, "fast-1");
    }

    #[test]
    fn skips_malformed_lines_without_failing() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(file, r#"{{"type":"assistant","usage":{{"input_tokens":3,"output_tokens":1}},"model":"m"}}"#).unwrap();
        let summary = parse_jsonl_transcript(file.path()).unwrap();
        assert_eq!(summary.input_tokens, 3);
    }

    #[test]
    fn missing_file_returns_none() {
        assert!(parse_jsonl_transcript(Path::new("/nonexistent/path.jsonl")).is_none());
    }

    #[test]
    fn empty_file_returns_none() {
        let file = NamedTempFile::new().unwrap();
        assert!(parse_jsonl_transcript(file.path()).is_none());
    }
}
