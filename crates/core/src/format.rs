use crate::{
    parser::parse_analysis,
    types::{ParsedAnalysis, TableRow},
};

const TABLE_HEADERS: [&str; 3] = [
    "Timestamp",
    "Core Action & Emotional Beat",
    "Visual / Technical / Sound Notes",
];

const PLACEHOLDER: &str = "_(not provided)_";

fn push_section(output: &mut String, title: &str, body: &str) {
    output.push_str(&format!("## {}\n\n", title));
    if body.is_empty() {
        output.push_str(PLACEHOLDER);
    } else {
        output.push_str(body);
    }
    output.push_str("\n\n");
}

/// Render scene rows as a Markdown table
pub fn format_scene_table(rows: &[TableRow]) -> String {
    let mut output = format!("| {} |\n|---|---|---|\n", TABLE_HEADERS.join(" | "));
    for row in rows {
        output.push_str(&format!(
            "| {} | {} | {} |\n",
            row.timestamp, row.action, row.notes
        ));
    }
    output
}

/// Format a parsed analysis as human-readable markdown
pub fn format_analysis_readable(analysis: &ParsedAnalysis) -> String {
    let mut output = String::new();

    push_section(
        &mut output,
        "Global Cohesion Block",
        &analysis.global_cohesion_block,
    );

    output.push_str("## Detailed Scene Breakdown\n\n");
    if analysis.scene_breakdown.is_empty() {
        output.push_str(PLACEHOLDER);
        output.push_str("\n\n");
    } else {
        output.push_str(&format_scene_table(&analysis.scene_breakdown));
        output.push('\n');
    }

    push_section(
        &mut output,
        "Technical Style Analysis",
        &analysis.technical_analysis,
    );

    output
}

/// Structured view when the text parses, otherwise the text verbatim.
pub fn render_analysis(raw: &str) -> String {
    match parse_analysis(raw) {
        Some(parsed) => format_analysis_readable(&parsed),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_all_three_sections() {
        let analysis = ParsedAnalysis {
            global_cohesion_block: "Characters: a dog".to_string(),
            scene_breakdown: vec![TableRow {
                timestamp: "00:00-00:05".to_string(),
                action: "Dog runs".to_string(),
                notes: "Wide shot".to_string(),
            }],
            technical_analysis: "Documentary style.".to_string(),
        };

        let out = format_analysis_readable(&analysis);

        let cohesion = out.find("## Global Cohesion Block").unwrap();
        let table = out.find("## Detailed Scene Breakdown").unwrap();
        let technical = out.find("## Technical Style Analysis").unwrap();
        assert!(cohesion < table && table < technical);
        assert!(out.contains("| 00:00-00:05 | Dog runs | Wide shot |"));
        assert!(out.contains("Documentary style."));
        assert!(!out.contains(PLACEHOLDER));
    }

    #[test]
    fn empty_sections_get_placeholder() {
        let analysis = ParsedAnalysis {
            technical_analysis: "Noir.".to_string(),
            ..Default::default()
        };

        let out = format_analysis_readable(&analysis);
        assert_eq!(out.matches(PLACEHOLDER).count(), 2);
    }

    #[test]
    fn unstructured_text_is_shown_verbatim() {
        let raw = "I could not follow the requested format, sorry.\n";
        assert_eq!(render_analysis(raw), raw);
    }

    #[test]
    fn structured_text_is_reformatted() {
        let raw = "GLOBAL COHESION BLOCK\nA beach.\nDETAILED SCENE BREAKDOWN TABLE\n|a|b|c|\n|-|-|-|\nTECHNICAL STYLE ANALYSIS\nWarm tones.";
        let out = render_analysis(raw);

        assert!(out.starts_with("## Global Cohesion Block\n\nA beach."));
        assert!(out.contains("Warm tones."));
    }
}
