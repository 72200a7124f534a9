//! Recipe text → sections, ingredients and instructions
//!
//! Each sanitized line is classified by an ordered list of rules; the first
//! matching rule decides what happens to the line.

use std::borrow::BorrowMut;
use std::sync::LazyLock;
use regex::Regex;
use tracing::{debug, trace};
use mise_core::{IdGenerator, ParsedRecipe, ParsedSection};
use crate::ingredient::parse_ingredient_line_with;
use crate::instructions::parse_instructions;
use crate::sanitize::sanitize_line;

static INSTRUCTIONS_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#*\s*(?:instructions|directions|steps|method|preparation|how to make(?: it)?)\s*:?$").unwrap()
});

static INGREDIENTS_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#*\s*ingredients?\s*:?$").unwrap());

static SUB_RECIPE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#*\s*(?:for the\b.*|frosting|filling|glaze|topping|sauce|dressing|marinade|crust|icing|batter|dough|garnish)\s*:?$").unwrap()
});

/// Lines ending in ':' shorter than this are section titles
const SECTION_TITLE_MAX_CHARS: usize = 40;

/// Which part of the recipe the parser is reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Ingredients,
    Instructions,
}

/// What a classified line means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    InstructionsHeader,
    IngredientsHeader,
    Instruction,
    SectionHeader,
    Ingredient,
}

/// A named classification rule
pub struct HeaderRule {
    pub name: &'static str,
    pub kind: LineKind,
    matches: fn(&str, Mode) -> bool,
}

impl HeaderRule {
    pub fn matches(&self, line: &str, mode: Mode) -> bool {
        (self.matches)(line, mode)
    }
}

/// Classification rules, first match wins
pub static HEADER_RULES: [HeaderRule; 5] = [
    HeaderRule {
        name: "instructions-header",
        kind: LineKind::InstructionsHeader,
        matches: |line, _| INSTRUCTIONS_HEADER.is_match(line),
    },
    HeaderRule {
        name: "ingredients-header",
        kind: LineKind::IngredientsHeader,
        matches: |line, _| INGREDIENTS_HEADER.is_match(line),
    },
    HeaderRule {
        name: "instruction",
        kind: LineKind::Instruction,
        matches: |_, mode| mode == Mode::Instructions,
    },
    HeaderRule {
        name: "section-header",
        kind: LineKind::SectionHeader,
        matches: |line, _| is_section_header(line),
    },
    HeaderRule {
        name: "ingredient",
        kind: LineKind::Ingredient,
        matches: |_, _| true,
    },
];

fn is_section_header(line: &str) -> bool {
    (line.ends_with(':') && line.chars().count() < SECTION_TITLE_MAX_CHARS)
        || SUB_RECIPE_HEADER.is_match(line)
}

/// Find the first rule matching a sanitized, non-empty line
pub fn classify(line: &str, mode: Mode) -> &'static HeaderRule {
    HEADER_RULES.iter()
        .find(|rule| rule.matches(line, mode))
        .unwrap_or(&HEADER_RULES[HEADER_RULES.len() - 1])
}

/// Section title without '#' prefix or trailing ':'
fn section_title(line: &str) -> String {
    line.trim_start_matches('#')
        .trim()
        .trim_end_matches(':')
        .trim_end()
        .to_string()
}

/// Recipe text parser.
///
/// Owns an `IdGenerator` by default; `with_ids(&mut ids)` borrows the
/// caller's instead so ids stay unique across several parses.
pub struct RecipeParser<G: BorrowMut<IdGenerator> = IdGenerator> {
    ids: G,
}

impl RecipeParser {
    pub fn new() -> Self {
        RecipeParser { ids: IdGenerator::new() }
    }
}

impl Default for RecipeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: BorrowMut<IdGenerator>> RecipeParser<G> {
    pub fn with_ids(ids: G) -> Self {
        RecipeParser { ids }
    }

    pub fn parse(&mut self, text: &str) -> ParsedRecipe {
        let ids: &mut IdGenerator = self.ids.borrow_mut();
        let mut mode = Mode::Ingredients;
        let mut sections: Vec<ParsedSection> = Vec::new();
        let mut current = ParsedSection::new(ids.next("sec"), "");
        let mut instruction_lines: Vec<String> = Vec::new();

        for raw in text.lines() {
            let line = sanitize_line(raw);
            if line.is_empty() {
                // Paragraph boundary between instruction blocks
                if mode == Mode::Instructions && instruction_lines.last().map_or(false, |l| !l.is_empty()) {
                    instruction_lines.push(String::new());
                }
                continue;
            }

            let rule = classify(&line, mode);
            trace!(rule = rule.name, line = %line, "classified");

            match rule.kind {
                LineKind::InstructionsHeader => {
                    flush(&mut sections, &mut current, ParsedSection::new(ids.next("sec"), ""));
                    mode = Mode::Instructions;
                }
                LineKind::IngredientsHeader => {
                    mode = Mode::Ingredients;
                }
                LineKind::Instruction => instruction_lines.push(line),
                LineKind::SectionHeader => {
                    let title = section_title(&line);
                    flush(&mut sections, &mut current, ParsedSection::new(ids.next("sec"), title));
                }
                LineKind::Ingredient => {
                    if let Some(ingredient) = parse_ingredient_line_with(&line, ids) {
                        current.ingredients.push(ingredient);
                    }
                }
            }
        }

        if !current.is_empty() {
            sections.push(current);
        }

        let instructions = parse_instructions(&instruction_lines.join("\n"));
        debug!(
            sections = sections.len(),
            ingredients = sections.iter().map(|s| s.ingredients.len()).sum::<usize>(),
            steps = instructions.len(),
            "parsed recipe"
        );

        ParsedRecipe {
            sections,
            notes: String::new(),
            instructions,
            title: None,
        }
    }

    /// Give back the id generator (to keep numbering for later edits)
    pub fn into_ids(self) -> G {
        self.ids
    }
}

/// Close the current section, keeping it only if it has ingredients
fn flush(sections: &mut Vec<ParsedSection>, current: &mut ParsedSection, next: ParsedSection) {
    let done = std::mem::replace(current, next);
    if !done.is_empty() {
        sections.push(done);
    }
}

/// Parse recipe text with a fresh id generator
pub fn parse_recipe_text(text: &str) -> ParsedRecipe {
    RecipeParser::new().parse(text)
}
