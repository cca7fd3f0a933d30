use std::path::Path;

use tokio::fs;

use crate::{error::Result, parser::parse_analysis, types::AnalysisReport};

impl AnalysisReport {
    /// Bundle a raw answer with its parsed projection.
    pub fn new(
        source: impl Into<String>,
        mime_type: impl Into<String>,
        model: impl Into<String>,
        raw: String,
    ) -> Self {
        let parsed = parse_analysis(&raw);
        Self {
            source: source.into(),
            mime_type: mime_type.into(),
            model: model.into(),
            raw,
            parsed,
        }
    }
}

/// Save a report to a file
pub async fn save_report(report: &AnalysisReport, path: &Path) -> Result<()> {
    let pretty_json = serde_json::to_string_pretty(report)?;
    fs::write(path, &pretty_json).await?;
    Ok(())
}

/// Load a report from a saved file
pub async fn load_report(path: &Path) -> Result<AnalysisReport> {
    let json_content = fs::read_to_string(path).await?;
    let report: AnalysisReport = serde_json::from_str(&json_content)?;
    Ok(report)
}

/// Read a previously captured raw model answer
pub async fn load_raw_text(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path).await?)
}
