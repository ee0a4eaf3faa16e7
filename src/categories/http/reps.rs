use serde::Serialize;

use crate::{categories::domain, validation::FieldErrors};

#[derive(Clone, Debug, Serialize)]
pub struct Category {
    pub category_code: String,
    pub name: String,
    pub description: Option<String>,
}

impl From<&domain::Category> for Category {
    fn from(category: &domain::Category) -> Self {
        Self {
            category_code: category.category_code.clone(),
            name: category.name.clone(),
            description: category.description.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct CategoryList {
    pub message: &'static str,
    pub categories: Vec<Category>,
}

#[derive(Serialize)]
pub struct CreatedCategory {
    pub message: &'static str,
    pub category: Category,
}

#[derive(Serialize)]
pub struct PopulatedCategories {
    pub message: &'static str,
    pub data: Vec<Category>,
}

#[derive(Serialize)]
pub struct InvalidCategory {
    pub message: &'static str,
    pub errors: FieldErrors,
}

#[derive(Serialize)]
pub struct CategoryFailure {
    pub message: &'static str,
    pub error: &'static str,
}
