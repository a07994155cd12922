//! # Recipe Documents
//!
//! The structured recipe that page extractors produce (name, image,
//! ingredients, preparation steps) and its conversion to imperial units.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::converter::UnitConverter;
use crate::errors::AppResult;
use crate::quantity::NOT_APPLICABLE;

/// One ingredient row as extracted from a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    /// Quantity text or number; `"n/a"` when the page had none
    pub quantity: Value,
    /// Unit text; `"n/a"` when the page had none
    pub unit: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: impl Into<Value>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            unit: unit.into(),
        }
    }

    fn has_quantity(&self) -> bool {
        match &self.quantity {
            Value::String(text) => text.trim() != NOT_APPLICABLE,
            Value::Null => false,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub image: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub preparation: Vec<String>,
}

impl Recipe {
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl UnitConverter {
    /// Convert one ingredient row.
    ///
    /// The name goes through [`convert_units_name`](UnitConverter::convert_units_name);
    /// quantity and unit are converted together unless the quantity is `n/a`.
    /// Whole numbers are written as integers.
    pub fn convert_ingredient(&self, ingredient: &Ingredient) -> AppResult<Ingredient> {
        let name = self.convert_units_name(&ingredient.name);

        if !ingredient.has_quantity() {
            return Ok(Ingredient {
                name,
                quantity: ingredient.quantity.clone(),
                unit: ingredient.unit.clone(),
            });
        }

        let converted =
            self.convert_ing_value(&ingredient.quantity, &Value::String(ingredient.unit.clone()))?;
        debug!(
            ingredient = %ingredient.name,
            quantity = %converted.amount,
            unit = %converted.unit,
            "Converted ingredient"
        );
        Ok(Ingredient {
            name,
            quantity: converted.amount.to_json(),
            unit: converted.unit,
        })
    }

    /// Convert every ingredient and preparation step of a recipe
    pub fn convert_recipe(&self, recipe: &Recipe) -> AppResult<Recipe> {
        let ingredients = recipe
            .ingredients
            .iter()
            .map(|ingredient| self.convert_ingredient(ingredient))
            .collect::<AppResult<Vec<_>>>()?;
        let preparation = recipe
            .preparation
            .iter()
            .map(|step| self.convert_units_prep(step))
            .collect();

        info!(
            recipe = %recipe.name,
            ingredients = ingredients.len(),
            steps = recipe.preparation.len(),
            "Converted recipe to imperial units"
        );
        Ok(Recipe {
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            ingredients,
            preparation,
        })
    }
}
