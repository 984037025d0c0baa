// Product store: multipart payloads (image upload), updates via POST,
// plus the category list the product forms pick from.

use serde_json::Value;
use shopdesk_api::{Body, Reply};

use super::entity::EntityStore;
use super::requests::ProductInput;
use crate::error::CoreError;
use crate::model::{Category, EntityId, Product};

pub type ProductStore = EntityStore<Product>;

impl EntityStore<Product> {
    /// Create a product. The image is required.
    pub async fn create_product(&self, input: &ProductInput) -> Result<Reply<Value>, CoreError> {
        input.validate(true)?;
        self.create(Body::Form(input.to_form())).await
    }

    /// Update a product. Without an image the stored one is kept.
    pub async fn update_product(
        &self,
        id: &EntityId,
        input: &ProductInput,
    ) -> Result<Reply<Value>, CoreError> {
        input.validate(false)?;
        self.update(id, Body::Form(input.to_form())).await
    }

    pub async fn categories(&self) -> Result<Vec<Category>, CoreError> {
        self.api()
            .list_categories()
            .await
            .map(|records| records.into_iter().map(Category::from).collect())
            .map_err(|e| self.router().reject(e))
    }
}
