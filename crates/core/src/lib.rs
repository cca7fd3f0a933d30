//! Framelens Core Library
//!
//! Encodes a video for inline upload, asks a multimodal model for a
//! three-part scene analysis, and extracts the structured sections from the
//! free-text answer.

pub mod analysis;
pub mod config;
pub mod encoder;
pub mod error;
pub mod format;
pub mod parser;
pub mod prompt;
pub mod report;
pub mod session;
pub mod types;

// Re-export commonly used items at crate root
pub use analysis::{AnalysisClient, describe_error, ensure_video};
pub use config::Config;
pub use encoder::{encode_bytes, encode_file, split_data_url, to_data_url};
pub use error::{FramelensError, Result};
pub use format::{format_analysis_readable, format_scene_table, render_analysis};
pub use parser::{parse_analysis, parse_table_rows};
pub use report::{load_raw_text, load_report, save_report};
pub use session::{AnalysisSession, AnalysisState};
pub use types::{AnalysisReport, EncodedMedia, ParsedAnalysis, TableRow};
