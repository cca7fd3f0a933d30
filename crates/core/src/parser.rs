//! Best-effort extraction of the three-section template from model output.
//!
//! Parsing never fails loudly: when nothing recognisable is found the result is
//! `None` and callers fall back to showing the raw text.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::types::{ParsedAnalysis, TableRow};

pub const COHESION_MARKER: &str = "GLOBAL COHESION BLOCK";
pub const TABLE_MARKER: &str = "DETAILED SCENE BREAKDOWN TABLE";
pub const TECHNICAL_MARKER: &str = "TECHNICAL STYLE ANALYSIS";

/// Header row and Markdown separator row.
const TABLE_PREAMBLE_LINES: usize = 2;
const TABLE_COLUMNS: usize = 3;

fn between(start: &str, end: &str) -> Regex {
    let pattern = format!("(?s){}(.*?){}", regex::escape(start), regex::escape(end));
    Regex::new(&pattern).expect("section pattern is a valid regex")
}

static COHESION_SECTION: LazyLock<Regex> = LazyLock::new(|| between(COHESION_MARKER, TABLE_MARKER));
static TABLE_SECTION: LazyLock<Regex> = LazyLock::new(|| between(TABLE_MARKER, TECHNICAL_MARKER));
static TECHNICAL_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!("(?s){}(.*)", regex::escape(TECHNICAL_MARKER));
    Regex::new(&pattern).expect("section pattern is a valid regex")
});

fn capture_trimmed<'t>(pattern: &Regex, text: &'t str) -> &'t str {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or("")
}

/// Turn a pipe-delimited table block into rows.
///
/// The first two lines are always skipped, whatever they contain. Lines that
/// do not have exactly three non-empty cells are dropped.
pub fn parse_table_rows(block: &str) -> Vec<TableRow> {
    block
        .lines()
        .skip(TABLE_PREAMBLE_LINES)
        .filter_map(|line| {
            let cells: Vec<&str> = line
                .split('|')
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .collect();

            match cells.as_slice() {
                [timestamp, action, notes] => Some(TableRow {
                    timestamp: timestamp.to_string(),
                    action: action.to_string(),
                    notes: notes.to_string(),
                }),
                _ => {
                    debug!(
                        cells = cells.len(),
                        expected = TABLE_COLUMNS,
                        "skipping malformed table row"
                    );
                    None
                }
            }
        })
        .collect()
}

pub fn parse_analysis(text: &str) -> Option<ParsedAnalysis> {
    let parsed = ParsedAnalysis {
        global_cohesion_block: capture_trimmed(&COHESION_SECTION, text).to_string(),
        scene_breakdown: parse_table_rows(capture_trimmed(&TABLE_SECTION, text)),
        technical_analysis: capture_trimmed(&TECHNICAL_SECTION, text).to_string(),
    };

    if parsed.is_empty() {
        debug!(len = text.len(), "no structured sections found in analysis text");
        return None;
    }

    Some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOG_SCENARIO: &str = "GLOBAL COHESION BLOCK\nCharacters: a dog\nDETAILED SCENE BREAKDOWN TABLE\n| A | B | C |\n|---|---|---|\n| 00:00-00:05 | Dog runs | Wide shot |\nTECHNICAL STYLE ANALYSIS\nDocumentary style.";

    fn row(timestamp: &str, action: &str, notes: &str) -> TableRow {
        TableRow {
            timestamp: timestamp.to_string(),
            action: action.to_string(),
            notes: notes.to_string(),
        }
    }

    #[test]
    fn parses_dog_scenario() {
        let parsed = parse_analysis(DOG_SCENARIO).unwrap();

        assert_eq!(parsed.global_cohesion_block, "Characters: a dog");
        assert_eq!(
            parsed.scene_breakdown,
            vec![row("00:00-00:05", "Dog runs", "Wide shot")]
        );
        assert_eq!(parsed.technical_analysis, "Documentary style.");
    }

    #[test]
    fn no_markers_yields_none() {
        assert_eq!(parse_analysis("The video shows a dog running in a park."), None);
        assert_eq!(parse_analysis(""), None);
    }

    #[test]
    fn markers_with_empty_bodies_yield_none() {
        let text = "GLOBAL COHESION BLOCK\n\nDETAILED SCENE BREAKDOWN TABLE\n\nTECHNICAL STYLE ANALYSIS\n   ";
        assert_eq!(parse_analysis(text), None);
    }

    #[test]
    fn multiline_sections_are_trimmed_verbatim() {
        let text = "Intro chatter\nGLOBAL COHESION BLOCK\n\n  Characters: two cyclists\nEnvironment: coastal road\n\nDETAILED SCENE BREAKDOWN TABLE\n| T | A | N |\n|---|---|---|\nTECHNICAL STYLE ANALYSIS\n\nStyle: travel vlog.\nSound: wind and synth pads.\n\n";
        let parsed = parse_analysis(text).unwrap();

        assert_eq!(
            parsed.global_cohesion_block,
            "Characters: two cyclists\nEnvironment: coastal road"
        );
        assert!(parsed.scene_breakdown.is_empty());
        assert_eq!(
            parsed.technical_analysis,
            "Style: travel vlog.\nSound: wind and synth pads."
        );
    }

    #[test]
    fn keeps_all_valid_rows_in_order() {
        let block = "| Time | Action | Notes |\n|---|---|---|\n| 00:00-00:03 | Door opens | Close-up |\n| 00:03-00:07 | Man enters | Dolly in |\n| 00:07-00:12 | He sits | Static, room tone |";
        let rows = parse_table_rows(block);

        assert_eq!(
            rows,
            vec![
                row("00:00-00:03", "Door opens", "Close-up"),
                row("00:03-00:07", "Man enters", "Dolly in"),
                row("00:07-00:12", "He sits", "Static, room tone"),
            ]
        );
    }

    #[test]
    fn drops_rows_with_wrong_cell_count() {
        let block = "| Time | Action | Notes |\n|---|---|---|\n| 00:00-00:03 | Only two |\n| 00:03-00:07 | One | Two | Three | Four |\n| 00:07-00:09 |  | Empty cell dropped |\n\n| 00:09-00:10 | Kept | Yes |";
        let rows = parse_table_rows(block);

        assert_eq!(rows, vec![row("00:09-00:10", "Kept", "Yes")]);
    }

    #[test]
    fn rows_without_outer_pipes_are_accepted() {
        let block = "h\ns\n00:00-00:02 | Wave | Handheld";
        assert_eq!(
            parse_table_rows(block),
            vec![row("00:00-00:02", "Wave", "Handheld")]
        );
    }

    #[test]
    fn always_skips_first_two_lines() {
        // No header: the first data row is lost with the skip.
        let block = "| 00:00-00:01 | A | B |\n| 00:01-00:02 | C | D |\n| 00:02-00:03 | E | F |";
        assert_eq!(parse_table_rows(block), vec![row("00:02-00:03", "E", "F")]);
    }

    #[test]
    fn short_tables_have_no_rows() {
        assert!(parse_table_rows("").is_empty());
        assert!(parse_table_rows("| A | B | C |").is_empty());
        assert!(parse_table_rows("| A | B | C |\n|---|---|---|").is_empty());
    }

    #[test]
    fn partial_structure_is_returned() {
        let parsed = parse_analysis("Some preface\nTECHNICAL STYLE ANALYSIS\nNoir lighting.").unwrap();

        assert_eq!(parsed.global_cohesion_block, "");
        assert!(parsed.scene_breakdown.is_empty());
        assert_eq!(parsed.technical_analysis, "Noir lighting.");
    }

    #[test]
    fn table_only_is_returned() {
        let text = "DETAILED SCENE BREAKDOWN TABLE\n| A | B | C |\n|---|---|---|\n| 0:00-0:01 | x | y |\nTECHNICAL STYLE ANALYSIS";
        let parsed = parse_analysis(text).unwrap();

        assert_eq!(parsed.scene_breakdown, vec![row("0:00-0:01", "x", "y")]);
        assert_eq!(parsed.technical_analysis, "");
    }

    #[test]
    fn out_of_order_markers_leave_sections_empty() {
        let text = "DETAILED SCENE BREAKDOWN TABLE\nrows\nGLOBAL COHESION BLOCK\ncohesion\nTECHNICAL STYLE ANALYSIS\nstyle";
        let parsed = parse_analysis(text).unwrap();

        assert_eq!(parsed.global_cohesion_block, "");
        assert!(parsed.scene_breakdown.is_empty());
        assert_eq!(parsed.technical_analysis, "style");
    }

    #[test]
    fn cohesion_stops_at_first_table_marker() {
        let text = "GLOBAL COHESION BLOCK\nfirst\nDETAILED SCENE BREAKDOWN TABLE\nsecond\nDETAILED SCENE BREAKDOWN TABLE\nthird";
        let parsed = parse_analysis(text).unwrap();

        assert_eq!(parsed.global_cohesion_block, "first");
    }

    #[test]
    fn crlf_line_endings_are_handled() {
        let text = DOG_SCENARIO.replace('\n', "\r\n");
        let parsed = parse_analysis(&text).unwrap();

        assert_eq!(parsed.global_cohesion_block, "Characters: a dog");
        assert_eq!(parsed.scene_breakdown.len(), 1);
        assert_eq!(parsed.technical_analysis, "Documentary style.");
    }
}
