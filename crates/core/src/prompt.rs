//! Instruction sent alongside the video.
//!
//! The section headers below are matched literally by [`crate::parser`], so
//! they must stay in sync with the marker constants there.

use crate::parser::{COHESION_MARKER, TABLE_MARKER, TECHNICAL_MARKER};

pub static ANALYSIS_PROMPT: &str = r#"
You are an expert film analyst and cinematographer. Watch the attached video from start to finish
and produce a structured breakdown that a production team could use to recreate it shot for shot.

OUTPUT FORMAT: respond in exactly three sections, in this order, using these headers verbatim:

GLOBAL COHESION BLOCK
Describe every element that stays consistent across the video:
- Recurring characters: appearance, wardrobe, age range, distinguishing features
- Vehicles and notable props
- Environment and locations
- Baseline visual style, lighting, mood and audio atmosphere

DETAILED SCENE BREAKDOWN TABLE
A Markdown table with exactly three columns, one header row and one separator row, then one row
per shot or beat:
| Timestamp | Core Action & Emotional Beat | Visual, Technical & Sound Notes |
|---|---|---|
| 00:00-00:05 | What happens and how it feels | Shot size, camera movement, lighting, sound |
Rules for the table:
- Timestamps are ranges in MM:SS-MM:SS form and cover the whole video without gaps
- Never use the "|" character inside a cell
- Do not add extra columns or merge cells

TECHNICAL STYLE ANALYSIS
- Overall style and genre conventions
- Color palette and lighting approach
- Cinematography archetypes (framing, lenses, camera movement, editing rhythm)
- Sound design and music

CONTENT GUIDELINES:
- Describe action and conflict without graphic detail
- Do not use words such as "blood", "gore", "wound", "injury", "kill", "stab" or "corpse"
- Use softer substitutes instead: "red liquid" or "stage makeup" for blood, "is hurt" or
  "takes a hit" for an injury, "is defeated" or "falls motionless" for a death, "confrontation"
  for a violent fight
- Keep every description factual and suitable for a general audience

Output only the three sections. Do not add an introduction or a closing summary.
"#;

/// The three literal headers the response must contain, in order.
pub fn required_headers() -> [&'static str; 3] {
    [COHESION_MARKER, TABLE_MARKER, TECHNICAL_MARKER]
}
