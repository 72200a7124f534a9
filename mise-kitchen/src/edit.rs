//! Copy-on-write recipe editing
//!
//! Every operation takes the current recipe by reference and returns a new
//! one. Unknown ids and out-of-range step indices are errors; the input is
//! never touched either way.

use mise_core::{IdGenerator, ParsedIngredient, ParsedRecipe, ParsedSection};
use mise_parse::parse_ingredient_line_with;
use tracing::debug;
use crate::KitchenError;

fn ingredient_mut<'a>(recipe: &'a mut ParsedRecipe, id: &str) -> Option<&'a mut ParsedIngredient> {
    recipe.sections.iter_mut()
        .flat_map(|s| s.ingredients.iter_mut())
        .find(|i| i.id == id)
}

/// (section index, ingredient index) of an ingredient
fn position(recipe: &ParsedRecipe, id: &str) -> Option<(usize, usize)> {
    recipe.sections.iter().enumerate().find_map(|(si, section)| {
        section.ingredients.iter().position(|i| i.id == id).map(|ii| (si, ii))
    })
}

pub fn toggle_checked(recipe: &ParsedRecipe, id: &str) -> Result<ParsedRecipe, KitchenError> {
    let mut edited = recipe.clone();
    let ingredient = ingredient_mut(&mut edited, id)
        .ok_or_else(|| KitchenError::ingredient_not_found(id))?;
    ingredient.checked = !ingredient.checked;
    Ok(edited)
}

pub fn set_all_checked(recipe: &ParsedRecipe, checked: bool) -> ParsedRecipe {
    let mut edited = recipe.clone();
    for ingredient in edited.sections.iter_mut().flat_map(|s| s.ingredients.iter_mut()) {
        ingredient.checked = checked;
    }
    edited
}

/// Replace an ingredient by re-parsing `text`, keeping its id and checked
/// state. Blank text deletes the ingredient.
pub fn update_ingredient(recipe: &ParsedRecipe, id: &str, text: &str) -> Result<ParsedRecipe, KitchenError> {
    let mut edited = recipe.clone();
    let existing = ingredient_mut(&mut edited, id)
        .ok_or_else(|| KitchenError::ingredient_not_found(id))?;

    // The placeholder id is replaced by the existing one
    match parse_ingredient_line_with(text, &mut IdGenerator::new()) {
        Some(mut parsed) => {
            parsed.id = existing.id.clone();
            parsed.checked = existing.checked;
            *existing = parsed;
            Ok(edited)
        }
        None => delete_ingredient(recipe, id),
    }
}

/// Remove an ingredient, dropping its section if it ends up empty
pub fn delete_ingredient(recipe: &ParsedRecipe, id: &str) -> Result<ParsedRecipe, KitchenError> {
    let (si, ii) = position(recipe, id).ok_or_else(|| KitchenError::ingredient_not_found(id))?;
    let mut edited = recipe.clone();
    edited.sections[si].ingredients.remove(ii);
    edited.prune_empty_sections();
    debug!(id, sections = edited.sections.len(), "deleted ingredient");
    Ok(edited)
}

/// Move an ingredient into `section_id` at `index` (clamped to the end)
pub fn move_ingredient(
    recipe: &ParsedRecipe,
    id: &str,
    section_id: &str,
    index: usize,
) -> Result<ParsedRecipe, KitchenError> {
    let (si, ii) = position(recipe, id).ok_or_else(|| KitchenError::ingredient_not_found(id))?;
    if recipe.find_section(section_id).is_none() {
        return Err(KitchenError::section_not_found(section_id));
    }

    let mut edited = recipe.clone();
    let ingredient = edited.sections[si].ingredients.remove(ii);
    // Lookup again: the source section is still present until pruning
    let target = edited.sections.iter_mut()
        .find(|s| s.id == section_id)
        .ok_or_else(|| KitchenError::section_not_found(section_id))?;
    let index = index.min(target.ingredients.len());
    target.ingredients.insert(index, ingredient);
    edited.prune_empty_sections();
    Ok(edited)
}

/// Parse `text` and append it to `section_id`, or to the last section when
/// none is given. Blank text leaves the recipe as it is.
pub fn add_ingredient(
    recipe: &ParsedRecipe,
    section_id: Option<&str>,
    text: &str,
    ids: &mut IdGenerator,
) -> Result<ParsedRecipe, KitchenError> {
    if let Some(sid) = section_id {
        if recipe.find_section(sid).is_none() {
            return Err(KitchenError::section_not_found(sid));
        }
    }

    let mut edited = recipe.clone();
    let parsed = match parse_ingredient_line_with(text, ids) {
        Some(p) => p,
        None => return Ok(edited),
    };

    let target = match section_id {
        Some(sid) => edited.sections.iter_mut().find(|s| s.id == sid),
        None => edited.sections.last_mut(),
    };
    match target {
        Some(section) => section.ingredients.push(parsed),
        None => {
            let mut section = ParsedSection::new(ids.next("sec"), "");
            section.ingredients.push(parsed);
            edited.sections.push(section);
        }
    }
    Ok(edited)
}

fn check_step(recipe: &ParsedRecipe, index: usize) -> Result<(), KitchenError> {
    let len = recipe.instructions.len();
    if index >= len {
        return Err(KitchenError::StepOutOfRange { index, len });
    }
    Ok(())
}

/// Replace a step; blank text deletes it
pub fn update_step(recipe: &ParsedRecipe, index: usize, text: &str) -> Result<ParsedRecipe, KitchenError> {
    check_step(recipe, index)?;
    let text = text.trim();
    if text.is_empty() {
        return delete_step(recipe, index);
    }
    let mut edited = recipe.clone();
    edited.instructions[index] = text.to_string();
    Ok(edited)
}

pub fn delete_step(recipe: &ParsedRecipe, index: usize) -> Result<ParsedRecipe, KitchenError> {
    check_step(recipe, index)?;
    let mut edited = recipe.clone();
    edited.instructions.remove(index);
    Ok(edited)
}

/// Move step `from` to position `to` (clamped to the end)
pub fn move_step(recipe: &ParsedRecipe, from: usize, to: usize) -> Result<ParsedRecipe, KitchenError> {
    check_step(recipe, from)?;
    let mut edited = recipe.clone();
    let step = edited.instructions.remove(from);
    let to = to.min(edited.instructions.len());
    edited.instructions.insert(to, step);
    Ok(edited)
}

pub fn add_step(recipe: &ParsedRecipe, text: &str) -> ParsedRecipe {
    let mut edited = recipe.clone();
    let text = text.trim();
    if !text.is_empty() {
        edited.instructions.push(text.to_string());
    }
    edited
}

#[cfg(test)]
mod tests {
    use super::*;
    use mise_parse::RecipeParser;

    fn sample() -> (ParsedRecipe, IdGenerator) {
        let mut parser = RecipeParser::new();
        let recipe = parser.parse(
            "2 cups flour\n1 tsp salt\nGlaze:\n1 cup sugar\nInstructions\n1. Mix\n2. Bake\n3. Glaze",
        );
        (recipe, parser.into_ids())
    }

    fn id_of(recipe: &ParsedRecipe, name: &str) -> String {
        recipe.ingredients().find(|i| i.ingredient == name).map(|i| i.id.clone()).unwrap()
    }

    #[test]
    fn test_toggle_checked() {
        let (recipe, _) = sample();
        let id = id_of(&recipe, "salt");
        let toggled = toggle_checked(&recipe, &id).unwrap();
        assert!(toggled.find_ingredient(&id).unwrap().checked);
        assert!(!recipe.find_ingredient(&id).unwrap().checked);
        let back = toggle_checked(&toggled, &id).unwrap();
        assert_eq!(back, recipe);
    }

    #[test]
    fn test_toggle_unknown_id() {
        let (recipe, _) = sample();
        assert_eq!(toggle_checked(&recipe, "ing-999").unwrap_err(),
            KitchenError::ingredient_not_found("ing-999"));
    }

    #[test]
    fn test_set_all_checked() {
        let (recipe, _) = sample();
        let all = set_all_checked(&recipe, true);
        assert!(all.ingredients().all(|i| i.checked));
        assert!(set_all_checked(&all, false).ingredients().all(|i| !i.checked));
    }

    #[test]
    fn test_update_ingredient_keeps_id_and_checked() {
        let (recipe, mut ids) = sample();
        let id = id_of(&recipe, "flour");
        let checked = toggle_checked(&recipe, &id).unwrap();
        let updated = update_ingredient(&checked, &id, "3 cups bread flour").unwrap();
        let ing = updated.find_ingredient(&id).unwrap();
        assert_eq!(ing.quantity, Some(3.0));
        assert_eq!(ing.ingredient, "bread flour");
        assert_eq!(ing.original_text, "3 cups bread flour");
        assert!(ing.checked);

        // Numbering continues where parsing left off
        let before = ids.current();
        let added = add_ingredient(&updated, None, "1 lemon", &mut ids).unwrap();
        assert_eq!(ids.current(), before + 1);
        let ids_after: Vec<&str> = added.ingredients().map(|i| i.id.as_str()).collect();
        assert!(ids_after.contains(&id.as_str()));
    }

    #[test]
    fn test_update_ingredient_ids_unchanged() {
        let (recipe, _) = sample();
        let id = id_of(&recipe, "flour");
        let updated = update_ingredient(&recipe, &id, "1 tbsp rye flour").unwrap();
        let before: Vec<&str> = recipe.ingredients().map(|i| i.id.as_str()).collect();
        let after: Vec<&str> = updated.ingredients().map(|i| i.id.as_str()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_update_with_blank_text_deletes() {
        let (recipe, _) = sample();
        let id = id_of(&recipe, "flour");
        let updated = update_ingredient(&recipe, &id, "  ").unwrap();
        assert!(updated.find_ingredient(&id).is_none());
        assert_eq!(updated.ingredient_count(), 2);
    }

    #[test]
    fn test_delete_last_ingredient_removes_section() {
        let (recipe, _) = sample();
        let id = id_of(&recipe, "sugar");
        let edited = delete_ingredient(&recipe, &id).unwrap();
        assert_eq!(edited.sections.len(), 1);
        assert!(edited.sections.iter().all(|s| s.title != "Glaze"));
        assert_eq!(recipe.sections.len(), 2);
    }

    #[test]
    fn test_move_ingredient_between_sections() {
        let (recipe, _) = sample();
        let salt = id_of(&recipe, "salt");
        let glaze = recipe.sections[1].id.clone();
        let moved = move_ingredient(&recipe, &salt, &glaze, 0).unwrap();
        let names: Vec<&str> = moved.sections[1].ingredients.iter().map(|i| i.ingredient.as_str()).collect();
        assert_eq!(names, vec!["salt", "sugar"]);
        assert_eq!(moved.sections[0].ingredients.len(), 1);
    }

    #[test]
    fn test_move_ingredient_clamps_and_prunes() {
        let (recipe, _) = sample();
        let sugar = id_of(&recipe, "sugar");
        let first = recipe.sections[0].id.clone();
        let moved = move_ingredient(&recipe, &sugar, &first, 99).unwrap();
        assert_eq!(moved.sections.len(), 1);
        assert_eq!(moved.sections[0].ingredients.last().unwrap().ingredient, "sugar");
    }

    #[test]
    fn test_move_ingredient_unknown_section() {
        let (recipe, _) = sample();
        let salt = id_of(&recipe, "salt");
        assert!(matches!(move_ingredient(&recipe, &salt, "sec-404", 0), Err(KitchenError::NotFound { what: "section", .. })));
    }

    #[test]
    fn test_add_ingredient() {
        let (recipe, mut ids) = sample();
        let added = add_ingredient(&recipe, None, "2 eggs", &mut ids).unwrap();
        assert_eq!(added.sections[1].ingredients.last().unwrap().ingredient, "eggs");

        let first = recipe.sections[0].id.clone();
        let added = add_ingredient(&recipe, Some(&first), "1 lemon", &mut ids).unwrap();
        assert_eq!(added.sections[0].ingredients.len(), 3);

        let unchanged = add_ingredient(&recipe, None, "", &mut ids).unwrap();
        assert_eq!(unchanged, recipe);
    }

    #[test]
    fn test_added_ids_do_not_collide() {
        let (recipe, _) = sample();
        let mut ids = IdGenerator::starting_after(&recipe);
        let added = add_ingredient(&recipe, None, "2 eggs", &mut ids).unwrap();
        let mut all: Vec<&str> = added.ingredients().map(|i| i.id.as_str()).collect();
        let total = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), total);
    }

    #[test]
    fn test_add_ingredient_to_empty_recipe() {
        let mut ids = IdGenerator::new();
        let added = add_ingredient(&ParsedRecipe::default(), None, "1 pear", &mut ids).unwrap();
        assert_eq!(added.sections.len(), 1);
        assert!(added.sections[0].is_untitled());
    }

    #[test]
    fn test_step_editing() {
        let (recipe, _) = sample();
        assert_eq!(recipe.instructions, vec!["Mix", "Bake", "Glaze"]);

        let updated = update_step(&recipe, 1, " Bake 20 min ").unwrap();
        assert_eq!(updated.instructions[1], "Bake 20 min");

        let deleted = delete_step(&recipe, 0).unwrap();
        assert_eq!(deleted.instructions, vec!["Bake", "Glaze"]);

        let moved = move_step(&recipe, 2, 0).unwrap();
        assert_eq!(moved.instructions, vec!["Glaze", "Mix", "Bake"]);

        let added = add_step(&recipe, "Serve");
        assert_eq!(added.instructions.last().map(String::as_str), Some("Serve"));
        assert_eq!(add_step(&recipe, "  "), recipe);

        assert_eq!(update_step(&recipe, 0, "").unwrap().instructions.len(), 2);
    }

    #[test]
    fn test_step_out_of_range() {
        let (recipe, _) = sample();
        assert_eq!(delete_step(&recipe, 3).unwrap_err(), KitchenError::StepOutOfRange { index: 3, len: 3 });
        assert!(move_step(&recipe, 7, 0).is_err());
    }
}
