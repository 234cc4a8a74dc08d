//! Instructions sent to the extraction capability.

use crate::model::Recipe;

pub const IMAGE_EXTRACTION_SYSTEM: &str =
    "You are a helpful assistant that extracts recipes from images.";

pub const IMAGE_EXTRACTION_USER: &str = "Please extract the recipe from the following image:";

pub const SEGMENTATION_SYSTEM: &str =
    "You are a helpful assistant that splits recipe instructions into distinct steps.";

/// The illustration style is fixed here; only the recipe summary varies.
pub const ILLUSTRATION_SYSTEM: &str = r#"You are an expert image prompt engineer specializing in vibrant, abstract, isometric art.

Given a recipe description, your task is to generate a highly detailed image prompt that visually translates the unique ingredients, textures, and mood of the recipe into an abstract, colorful, isometric illustration.

Instructions:
- Analyze the recipe and select visually distinctive elements (e.g., main ingredients, textures, preparation methods, or cultural associations).
- Map these elements into abstract visual motifs, geometric forms, or color palettes.
- Specify color schemes and isometric composition.
- Use vivid, descriptive language; avoid generic phrases or placeholders.
- Maintain the style: abstract, colorful, isometric, with a strong Pop Art/cubism influence, intricate details, flat color, strong lines, and a digital look.
- Return only the prompt text. Do not include any explanations, introductions, or additional information.

Example for a cat in this style:
"Abstract expressionist Pop Art, cubist geometry, floating cat face (no body), bold green and orange, intricate patterns, holographic effect, black background, vibrant digital illustration, flat color, 2D, strong lines, isometric perspective.""#;

pub fn segmentation_user(raw_instructions: &str) -> String {
    format!("Please format the following recipe instructions: {raw_instructions}")
}

/// Summary of title, description and ingredient names for prompt synthesis.
pub fn illustration_user(recipe: &Recipe) -> String {
    format!(
        "Now, generate a similarly specific and vivid prompt for an image that represents the following recipe description: {}. Description: {}. Ingredients: {}",
        recipe.title,
        recipe.description,
        recipe.ingredient_names().join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecipeIngredient;

    #[test]
    fn test_illustration_user_lists_ingredients() {
        let recipe = Recipe {
            title: "Brookies".to_string(),
            description: "Brownie meets cookie".to_string(),
            ingredients: vec![
                RecipeIngredient::fallback("flour"),
                RecipeIngredient::fallback("cocoa"),
            ],
            instructions: Vec::new(),
        };
        let prompt = illustration_user(&recipe);
        assert!(prompt.contains("Brookies"));
        assert!(prompt.contains("Description: Brownie meets cookie."));
        assert!(prompt.ends_with("Ingredients: flour, cocoa"));
    }

    #[test]
    fn test_style_is_fixed() {
        assert!(ILLUSTRATION_SYSTEM.contains("isometric"));
        assert!(ILLUSTRATION_SYSTEM.contains("flat color"));
        assert!(segmentation_user("Mix.").ends_with("Mix."));
    }
}
