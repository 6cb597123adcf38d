/*
 * Responsibility
 * - Drinks request/response DTOs + validate() for shape checks
 * - Two response projections of the same row: `short` (colors and
 *   proportions only, for the public menu) and `long` (full recipe,
 *   for holders of get:drinks-detail)
 */
use serde::{Deserialize, Serialize};

use crate::repos::drink_repo::{DrinkRow, RecipePart};

const MAX_TITLE_LEN: usize = 180;

#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    pub title: String,
    pub recipe: Vec<RecipePart>,
}

impl CreateDrinkRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title is required");
        }
        if self.title.len() > MAX_TITLE_LEN {
            return Err("title must be <= 180 chars");
        }
        validate_recipe(&self.recipe)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<Vec<RecipePart>>,
}

impl UpdateDrinkRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err("title cannot be empty");
            }
            if title.len() > MAX_TITLE_LEN {
                return Err("title must be <= 180 chars");
            }
        }
        if let Some(recipe) = &self.recipe {
            validate_recipe(recipe)?;
        }
        Ok(())
    }
}

fn validate_recipe(recipe: &[RecipePart]) -> Result<(), &'static str> {
    if recipe.is_empty() {
        return Err("recipe must have at least one part");
    }
    for part in recipe {
        if part.name.trim().is_empty() {
            return Err("recipe part name is required");
        }
        if part.color.trim().is_empty() {
            return Err("recipe part color is required");
        }
        if part.parts < 1 {
            return Err("recipe parts must be >= 1");
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct DrinkLong {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<RecipePart>,
}

impl From<DrinkRow> for DrinkLong {
    fn from(row: DrinkRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            recipe: row.recipe.0,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ShortRecipePart {
    pub color: String,
    pub parts: i32,
}

#[derive(Debug, Serialize)]
pub struct DrinkShort {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortRecipePart>,
}

impl From<DrinkRow> for DrinkShort {
    fn from(row: DrinkRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            recipe: row
                .recipe
                .0
                .into_iter()
                .map(|part| ShortRecipePart {
                    color: part.color,
                    parts: part.parts,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    pub fn new(drinks: Vec<T>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub delete: i64,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sqlx::types::Json;

    use super::*;

    fn part(name: &str, color: &str, parts: i32) -> RecipePart {
        RecipePart {
            name: name.to_string(),
            color: color.to_string(),
            parts,
        }
    }

    fn row() -> DrinkRow {
        DrinkRow {
            id: 7,
            title: "Flat White".to_string(),
            recipe: Json(vec![part("espresso", "#5c3317", 1), part("milk", "#fffdd0", 3)]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn create_request_rejects_blank_title_and_empty_recipe() {
        let req = CreateDrinkRequest {
            title: "  ".to_string(),
            recipe: vec![part("water", "#fff", 1)],
        };
        assert_eq!(req.validate(), Err("title is required"));

        let req = CreateDrinkRequest {
            title: "Water".to_string(),
            recipe: vec![],
        };
        assert_eq!(req.validate(), Err("recipe must have at least one part"));
    }

    #[test]
    fn create_request_rejects_non_positive_parts() {
        let req = CreateDrinkRequest {
            title: "Water".to_string(),
            recipe: vec![part("water", "#fff", 0)],
        };
        assert_eq!(req.validate(), Err("recipe parts must be >= 1"));
    }

    #[test]
    fn update_request_allows_partial_bodies() {
        let req = UpdateDrinkRequest {
            title: None,
            recipe: None,
        };
        assert!(req.validate().is_ok());

        let req = UpdateDrinkRequest {
            title: Some(String::new()),
            recipe: None,
        };
        assert_eq!(req.validate(), Err("title cannot be empty"));
    }

    #[test]
    fn short_projection_drops_ingredient_names() {
        let short = DrinkShort::from(row());
        assert_eq!(short.id, 7);
        assert_eq!(short.recipe.len(), 2);
        let json = serde_json::to_value(&short.recipe).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"color": "#5c3317", "parts": 1},
                {"color": "#fffdd0", "parts": 3},
            ])
        );
    }

    #[test]
    fn long_projection_keeps_the_full_recipe() {
        let long = DrinkLong::from(row());
        assert_eq!(long.recipe[0].name, "espresso");
        assert_eq!(long.recipe[1].parts, 3);
    }
}
