// Customer store: JSON payloads, updates via PUT.

use serde_json::Value;
use shopdesk_api::Reply;

use super::entity::EntityStore;
use super::requests::CustomerInput;
use crate::error::CoreError;
use crate::model::{Customer, EntityId};

pub type CustomerStore = EntityStore<Customer>;

impl EntityStore<Customer> {
    pub async fn create_customer(&self, input: &CustomerInput) -> Result<Reply<Value>, CoreError> {
        self.create(input.to_body()?).await
    }

    pub async fn update_customer(
        &self,
        id: &EntityId,
        input: &CustomerInput,
    ) -> Result<Reply<Value>, CoreError> {
        self.update(id, input.to_body()?).await
    }
}
