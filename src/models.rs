use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::categories::domain::Category;

/// A row of the `category` table.
#[derive(Clone, Debug, FromRow)]
pub struct CategoryModel {
    pub id: i64,
    pub category_code: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CategoryModel> for Category {
    fn from(model: CategoryModel) -> Self {
        Self {
            category_code: model.category_code,
            name: model.name,
            description: model.description,
        }
    }
}
