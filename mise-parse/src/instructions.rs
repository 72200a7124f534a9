//! Instruction text → ordered steps

use std::sync::LazyLock;
use regex::Regex;
use tracing::debug;
use crate::sanitize::collapse_whitespace;

static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// "1.", "2)", "-", "*", "•", "Step 3:" followed by whitespace or end of line
static STEP_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:step\s*\d+\s*[:.)]?|\d+[.)]|[-*•])(?:\s+|$)").unwrap()
});

/// Split instruction text into steps.
///
/// Blank-line separated paragraphs are steps when there is more than one.
/// Otherwise each line opening with a step marker starts a new step and
/// unmarked lines continue the current one.
pub fn parse_instructions(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n");
    let paragraphs: Vec<&str> = PARAGRAPH_BREAK.split(&normalized)
        .filter(|p| !p.trim().is_empty())
        .collect();

    let steps = if paragraphs.len() > 1 {
        paragraphs.into_iter().map(clean_step).collect()
    } else {
        steps_by_marker(&normalized)
    };

    let steps: Vec<String> = steps.into_iter().filter(|s| !s.is_empty()).collect();
    debug!(steps = steps.len(), "parsed instructions");
    steps
}

fn steps_by_marker(text: &str) -> Vec<String> {
    let mut steps = Vec::new();
    let mut current: Option<String> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if STEP_MARKER.is_match(line) {
            if let Some(step) = current.take() {
                steps.push(step);
            }
            current = Some(clean_step(line));
        } else {
            current = Some(match current.take() {
                Some(step) if !step.is_empty() => format!("{} {}", step, collapse_whitespace(line)),
                _ => collapse_whitespace(line),
            });
        }
    }
    steps.extend(current);
    steps
}

/// Strip the leading marker and collapse whitespace
fn clean_step(text: &str) -> String {
    collapse_whitespace(&STEP_MARKER.replace(text.trim(), ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_lines() {
        assert_eq!(parse_instructions("1. Mix\n2. Bake"), vec!["Mix", "Bake"]);
    }

    #[test]
    fn test_paragraphs() {
        let text = "Mix well.\n\nBake 20 min.";
        assert_eq!(parse_instructions(text), vec!["Mix well.", "Bake 20 min."]);
    }

    #[test]
    fn test_paragraph_markers_stripped() {
        let text = "Step 1: Preheat the   oven.\n\n2) Grease\nthe pan.";
        assert_eq!(parse_instructions(text), vec!["Preheat the oven.", "Grease the pan."]);
    }

    #[test]
    fn test_continuation_lines_join() {
        let text = "- Whisk the eggs\nuntil pale\n* Fold in flour\n• Rest 10 min";
        assert_eq!(parse_instructions(text), vec![
            "Whisk the eggs until pale",
            "Fold in flour",
            "Rest 10 min",
        ]);
    }

    #[test]
    fn test_single_unmarked_paragraph() {
        assert_eq!(parse_instructions("Stir the sauce\nand serve."), vec!["Stir the sauce and serve."]);
    }

    #[test]
    fn test_decimal_is_not_a_marker() {
        assert_eq!(parse_instructions("1.5 cups go in first"), vec!["1.5 cups go in first"]);
    }

    #[test]
    fn test_empty() {
        assert!(parse_instructions("").is_empty());
        assert!(parse_instructions("\n \n1.\n").is_empty());
    }
}
