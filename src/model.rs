//! The normalized recipe schema every source converges to.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ValidationError;

/// A single ingredient line.
///
/// `quantity` and `unit` stay free text because sources use fractions,
/// ranges and phrases like "to taste". Both serialize as `null` rather than
/// being omitted, so the keys are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    pub quantity: Option<String>,
    pub unit: Option<String>,
}

impl RecipeIngredient {
    /// Record used when an ingredient line could not be parsed.
    pub fn fallback(text: impl Into<String>) -> Self {
        Self {
            name: text.into(),
            quantity: Some(String::new()),
            unit: Some(String::new()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.quantity.as_deref() == Some("") && self.unit.as_deref() == Some("")
    }
}

/// One numbered step of the method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeInstruction {
    pub step: u32,
    pub description: String,
}

/// Wrapper shape the segmenter asks the model for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeInstructionList {
    pub instructions: Vec<RecipeInstruction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: Vec<RecipeInstruction>,
}

/// A named JSON schema handed to the extraction capability.
#[derive(Debug, Clone)]
pub struct ResponseSchema {
    pub name: &'static str,
    pub schema: Value,
}

fn instruction_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "step": { "type": "integer" },
            "description": { "type": "string" }
        },
        "required": ["step", "description"],
        "additionalProperties": false
    })
}

fn ingredient_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "quantity": { "type": ["string", "null"] },
            "unit": { "type": ["string", "null"] }
        },
        "required": ["name", "quantity", "unit"],
        "additionalProperties": false
    })
}

impl Recipe {
    pub fn response_schema() -> ResponseSchema {
        ResponseSchema {
            name: "Recipe",
            schema: json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string" },
                    "description": { "type": "string" },
                    "ingredients": { "type": "array", "items": ingredient_schema() },
                    "instructions": { "type": "array", "items": instruction_schema() }
                },
                "required": ["title", "description", "ingredients", "instructions"],
                "additionalProperties": false
            }),
        }
    }

    /// Parse and validate model output constrained to [`Recipe::response_schema`].
    pub fn from_model_output(raw: &str) -> Result<Self, ValidationError> {
        let mut recipe: Recipe = parse_schema_json("Recipe", raw)?;
        if recipe.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        recipe.instructions = renumber_steps(recipe.instructions)?;
        Ok(recipe)
    }

    /// Names of all ingredients, in source order.
    pub fn ingredient_names(&self) -> Vec<&str> {
        self.ingredients.iter().map(|i| i.name.as_str()).collect()
    }
}

impl RecipeInstructionList {
    pub fn response_schema() -> ResponseSchema {
        ResponseSchema {
            name: "RecipeInstructionList",
            schema: json!({
                "type": "object",
                "properties": {
                    "instructions": { "type": "array", "items": instruction_schema() }
                },
                "required": ["instructions"],
                "additionalProperties": false
            }),
        }
    }

    pub fn from_model_output(raw: &str) -> Result<Self, ValidationError> {
        let list: RecipeInstructionList = parse_schema_json("RecipeInstructionList", raw)?;
        Ok(Self {
            instructions: renumber_steps(list.instructions)?,
        })
    }
}

/// Order steps by the number the model gave them, then number them 1..=N.
///
/// The sort is stable, so steps sharing a number keep their document order.
pub fn renumber_steps(
    mut steps: Vec<RecipeInstruction>,
) -> Result<Vec<RecipeInstruction>, ValidationError> {
    if let Some(index) = steps
        .iter()
        .position(|s| s.description.trim().is_empty())
    {
        return Err(ValidationError::EmptyInstruction { index });
    }

    steps.sort_by_key(|s| s.step);
    Ok(steps
        .into_iter()
        .zip(1..)
        .map(|(s, step)| RecipeInstruction {
            step,
            description: s.description.trim().to_string(),
        })
        .collect())
}

fn parse_schema_json<T: DeserializeOwned>(
    schema: &'static str,
    raw: &str,
) -> Result<T, ValidationError> {
    serde_json::from_str(strip_code_fence(raw))
        .map_err(|source| ValidationError::Schema { schema, source })
}

/// Models sometimes wrap JSON in a Markdown fence even when asked not to.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
