use anyhow::anyhow;
use thiserror::Error;
use tracing::debug;

use crate::{repos::DynCategoryRepo, validation::FieldErrors};

use super::{
    domain::{Category, NewCategory, NewCategoryData},
    seeder::DynCategorySeeder,
};

#[derive(Debug, Error)]
pub enum CreateCategoryError {
    /// The provided category data is invalid.
    #[error("invalid category data: {0:?}")]
    InvalidCategory(FieldErrors),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A service object providing functionality relating to categories.
#[derive(Clone)]
pub struct CategoryService {
    category_repo: DynCategoryRepo,
    seeder: DynCategorySeeder,
}

impl CategoryService {
    /// Create a new category service.
    ///
    /// # Arguments
    ///
    /// * `category_repo` - The repository used to persist and query
    ///   categories.
    /// * `seeder` - The source of generated categories used when populating
    ///   the store.
    pub fn new(category_repo: DynCategoryRepo, seeder: DynCategorySeeder) -> Self {
        Self {
            category_repo,
            seeder,
        }
    }

    pub async fn list_categories(&self) -> anyhow::Result<Vec<Category>> {
        self.category_repo.list_categories().await
    }

    pub async fn create_category(
        &self,
        data: NewCategoryData,
    ) -> Result<Category, CreateCategoryError> {
        let new_category =
            NewCategory::from_data(data).map_err(CreateCategoryError::InvalidCategory)?;

        Ok(self.category_repo.persist_category(&new_category).await?)
    }

    /// Generate and store a batch of placeholder categories.
    ///
    /// # Arguments
    ///
    /// * `count` - The number of categories to create.
    ///
    /// # Returns
    ///
    /// The stored categories, in the order they were created.
    pub async fn populate_categories(&self, count: usize) -> anyhow::Result<Vec<Category>> {
        let new_categories = self
            .seeder
            .generate(count)
            .into_iter()
            .map(NewCategory::from_data)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|errors| {
                anyhow!("Generated category data failed validation: {:?}", errors)
            })?;

        debug!(count, "Generated categories.");

        self.category_repo
            .persist_categories(&new_categories)
            .await
    }
}
