use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::{
    categories::domain::{Category, NewCategory},
    database::PostgresConnection,
    models::CategoryModel,
};

pub type DynCategoryRepo = Arc<dyn CategoryRepo + Send + Sync>;

#[async_trait]
pub trait CategoryRepo {
    /// List every stored category in the order they were created.
    async fn list_categories(&self) -> anyhow::Result<Vec<Category>>;

    /// Persist a new category.
    ///
    /// # Returns
    ///
    /// The category as it was stored.
    async fn persist_category(&self, category: &NewCategory) -> anyhow::Result<Category>;

    /// Persist a batch of categories.
    ///
    /// Either every category in the batch is stored or none of them are.
    async fn persist_categories(&self, categories: &[NewCategory])
        -> anyhow::Result<Vec<Category>>;
}

const INSERT_CATEGORY: &str = r#"
    INSERT INTO category (category_code, name, description)
    VALUES ($1, $2, $3)
    RETURNING id, category_code, name, description, created_at
"#;

#[async_trait]
impl CategoryRepo for PostgresConnection {
    async fn list_categories(&self) -> anyhow::Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, CategoryModel>(
            r#"
            SELECT id, category_code, name, description, created_at
            FROM category
            ORDER BY id
            "#,
        )
        .fetch_all(&**self)
        .await?;

        Ok(categories.into_iter().map(Category::from).collect())
    }

    async fn persist_category(&self, category: &NewCategory) -> anyhow::Result<Category> {
        let model = sqlx::query_as::<_, CategoryModel>(INSERT_CATEGORY)
            .bind(category.category_code())
            .bind(category.name())
            .bind(category.description())
            .fetch_one(&**self)
            .await?;

        info!(
            id = model.id,
            category_code = %model.category_code,
            created_at = %model.created_at,
            "Created category."
        );

        Ok(model.into())
    }

    async fn persist_categories(
        &self,
        categories: &[NewCategory],
    ) -> anyhow::Result<Vec<Category>> {
        let mut tx = self.begin().await?;

        let mut persisted = Vec::with_capacity(categories.len());
        for category in categories {
            let model = sqlx::query_as::<_, CategoryModel>(INSERT_CATEGORY)
                .bind(category.category_code())
                .bind(category.name())
                .bind(category.description())
                .fetch_one(&mut tx)
                .await?;

            persisted.push(Category::from(model));
        }

        tx.commit().await?;

        info!(count = persisted.len(), "Created category batch.");

        Ok(persisted)
    }
}
