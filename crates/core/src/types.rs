use serde::{Deserialize, Serialize};

/// Base64 video payload tagged with its media type, ready for a request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMedia {
    pub data: String,
    pub mime_type: String,
}

impl EncodedMedia {
    /// Size of the decoded payload, estimated from the base64 length.
    pub fn approx_decoded_len(&self) -> usize {
        self.data.len() / 4 * 3
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub timestamp: String,
    pub action: String,
    pub notes: String,
}

/// Structured projection of the model's free-text answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAnalysis {
    pub global_cohesion_block: String,
    pub scene_breakdown: Vec<TableRow>,
    pub technical_analysis: String,
}

impl ParsedAnalysis {
    pub fn is_empty(&self) -> bool {
        self.global_cohesion_block.is_empty()
            && self.scene_breakdown.is_empty()
            && self.technical_analysis.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub source: String,
    pub mime_type: String,
    pub model: String,
    pub raw: String,
    pub parsed: Option<ParsedAnalysis>,
}
