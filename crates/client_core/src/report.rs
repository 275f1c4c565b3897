//! Plain-text breed recognition report.

use std::{
    fs,
    path::{Path, PathBuf},
};

use shared::{domain::PredictionId, protocol::PredictionResult};
use tracing::info;

use crate::{error::ClientResult, render::format_percent};

pub const REPORT_TITLE: &str = "GOVANSH - Breed Recognition Report";
const RULE: &str = "================================";
const ATTRIBUTES_HEADER: &str = "Attributes:";

/// Fixed section always written, in order, even when the value is missing.
const SUMMARY_FIELDS: &[(&str, &str)] = &[
    ("origin", "Origin"),
    ("type", "Type"),
    ("milk_yield", "Milk Yield"),
    ("market_value", "Market Value"),
    ("govt_scheme", "Govt Scheme"),
    ("special", "Special"),
];

pub fn report_file_name(id: &PredictionId) -> String {
    let safe: String = id
        .as_str()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("govansh_report_{safe}.txt")
}

pub fn export_text(result: &PredictionResult) -> String {
    let info = &result.breed_info;
    let mut lines = vec![
        REPORT_TITLE.to_string(),
        RULE.to_string(),
        format!("Prediction ID: {}", result.prediction_id),
        format!("Timestamp: {}", result.timestamp),
        format!(
            "Breed: {} ({})",
            result.breed,
            result.localized_name().unwrap_or_default()
        ),
        format!("Confidence: {}", format_percent(result.confidence)),
        String::new(),
    ];
    for &(key, label) in SUMMARY_FIELDS {
        lines.push(format!("{label}: {}", info.get(key).unwrap_or_default()));
    }

    let remaining: Vec<(&str, &str)> = info
        .iter()
        .filter(|(key, _)| !SUMMARY_FIELDS.iter().any(|(k, _)| k == key))
        .collect();
    if !remaining.is_empty() {
        lines.push(String::new());
        lines.push(ATTRIBUTES_HEADER.to_string());
        for (key, value) in remaining {
            lines.push(format!("  {key}: {value}"));
        }
    }
    if let Some(model) = &result.model_version {
        lines.push(String::new());
        lines.push(format!("Model: {model}"));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Fields recoverable from an exported report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub prediction_id: PredictionId,
    pub breed: String,
    /// Percentage as printed, one decimal place.
    pub confidence_percent: f64,
}

pub fn parse_export_text(text: &str) -> Option<ReportSummary> {
    let mut lines = text.lines();
    if lines.next()? != REPORT_TITLE {
        return None;
    }

    let mut prediction_id = None;
    let mut breed = None;
    let mut confidence_percent = None;
    for line in lines {
        if let Some(id) = line.strip_prefix("Prediction ID: ") {
            prediction_id = Some(PredictionId(id.to_string()));
        } else if let Some(rest) = line.strip_prefix("Breed: ") {
            breed = Some(strip_localized_name(rest).to_string());
        } else if let Some(pct) = line.strip_prefix("Confidence: ") {
            confidence_percent = pct.trim_end_matches('%').parse::<f64>().ok();
        }
        if prediction_id.is_some() && breed.is_some() && confidence_percent.is_some() {
            break;
        }
    }

    Some(ReportSummary {
        prediction_id: prediction_id?,
        breed: breed?,
        confidence_percent: confidence_percent?,
    })
}

/// Drops the trailing `(localized name)` group, matching parentheses so a
/// localized name may itself contain them.
fn strip_localized_name(line: &str) -> &str {
    if !line.ends_with(')') {
        return line;
    }
    let mut depth = 0usize;
    for (idx, c) in line.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
                depth -= 1;
                if depth == 0 {
                    return line[..idx].strip_suffix(' ').unwrap_or(&line[..idx]);
                }
            }
            _ => {}
        }
    }
    line
}

/// Writes reports into one directory; the local stand-in for a browser download.
#[derive(Debug, Clone)]
pub struct ReportExporter {
    dir: PathBuf,
}

impl ReportExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `Ok(None)` when there is no result yet.
    pub fn export(&self, snapshot: Option<PredictionResult>) -> ClientResult<Option<PathBuf>> {
        let Some(result) = snapshot else {
            info!("no prediction to export yet");
            return Ok(None);
        };

        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(report_file_name(&result.prediction_id));
        fs::write(&path, export_text(&result))?;
        info!(
            prediction_id = %result.prediction_id,
            path = %path.display(),
            "report exported"
        );
        Ok(Some(path))
    }
}

#[cfg(test)]
#[path = "tests/report_tests.rs"]
mod tests;
