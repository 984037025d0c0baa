// Order store: list and detail reads plus the cart used to build new
// orders. Orders are never updated or deleted from this client.

use super::cart::Cart;
use super::collection::Snapshot;
use super::entity::EntityStore;
use crate::error::CoreError;
use crate::model::{EntityId, OrderDetail, OrderSummary};
use crate::stream::RowStream;

#[derive(Clone)]
pub struct OrderStore {
    orders: EntityStore<OrderSummary>,
    cart: Cart,
}

impl OrderStore {
    pub(crate) fn new(orders: EntityStore<OrderSummary>) -> Self {
        let cart = Cart::new(
            orders.api().clone(),
            orders.router().clone(),
            orders.alerts().clone(),
        );
        Self { orders, cart }
    }

    pub async fn fetch_list(&self) -> Result<Snapshot<OrderSummary>, CoreError> {
        self.orders.fetch_list().await
    }

    pub async fn get_one(&self, id: &EntityId) -> Result<OrderDetail, CoreError> {
        self.orders.get_one(id).await
    }

    pub fn rows(&self) -> Snapshot<OrderSummary> {
        self.orders.rows()
    }

    pub fn subscribe(&self) -> RowStream<OrderSummary> {
        self.orders.subscribe()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }
}
