// ── Cart aggregator ──
//
// In-memory builder of an order's line items. Items are validated and
// priced on the way in; the server recomputes prices on submit, so only
// product id, quantity and discount are sent.

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::Value;
use shopdesk_api::{ApiClient, Body, FormPayload, OrderDetailRecord, Reply, Resource};
use tracing::{debug, info};

use super::collection::{RowCollection, Snapshot};
use crate::alert::NotificationSink;
use crate::error::CoreError;
use crate::model::{AlertNotice, CartLineItem, EntityId, OptionRef, OrderDetail, sum_totals};
use crate::router::ErrorRouter;
use crate::sequence::RequestSequence;
use crate::stream::RowStream;

/// Hint shown on the product list when a rejected order names no product.
pub const SELECT_PRODUCT_HINT: &str = "Please select a product to edit";

#[derive(Clone)]
pub struct Cart {
    inner: Arc<CartInner>,
}

struct CartInner {
    api: ApiClient,
    router: ErrorRouter,
    alerts: NotificationSink,
    items: RowCollection<CartLineItem>,
    load_seq: RequestSequence,
}

impl Cart {
    pub(crate) fn new(api: ApiClient, router: ErrorRouter, alerts: NotificationSink) -> Self {
        Self {
            inner: Arc::new(CartInner {
                api,
                router,
                alerts,
                items: RowCollection::new(),
                load_seq: RequestSequence::default(),
            }),
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Validate, price and append a line item.
    ///
    /// Invalid input leaves the cart unchanged.
    pub fn add_item(
        &self,
        product: OptionRef,
        price: Decimal,
        quantity: u32,
        discount: Decimal,
    ) -> Result<CartLineItem, CoreError> {
        if !product.has_id() {
            return Err(CoreError::validation("Please select a product"));
        }
        if quantity < 1 {
            return Err(CoreError::validation("Quantity must be at least 1"));
        }
        if discount < Decimal::ZERO || discount > Decimal::ONE_HUNDRED {
            return Err(CoreError::validation("Discount must be between 0 and 100"));
        }
        if price < Decimal::ZERO {
            return Err(CoreError::validation("Price cannot be negative"));
        }

        let item = CartLineItem::priced(product, price, quantity, discount)?;
        self.inner.items.push(item.clone());
        debug!(product = %item.product.label, total = %item.total, "cart item added");
        Ok(item)
    }

    /// Remove the item at `index`; later items shift down.
    pub fn remove_item(&self, index: usize) -> Option<CartLineItem> {
        self.inner
            .items
            .remove_at(index)
            .map(|item| CartLineItem::clone(&item))
    }

    pub fn clear(&self) {
        self.inner.items.clear();
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn items(&self) -> Snapshot<CartLineItem> {
        self.inner.items.snapshot()
    }

    pub fn len(&self) -> usize {
        self.inner.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of line totals.
    pub fn grand_total(&self) -> Result<Decimal, CoreError> {
        sum_totals(self.items().iter().map(|item| &**item))
    }

    pub fn subscribe(&self) -> RowStream<CartLineItem> {
        RowStream::new(self.inner.items.subscribe())
    }

    // ── Server calls ─────────────────────────────────────────────────

    /// Submit the cart as a new order for `customer`.
    ///
    /// On success the cart is cleared and a success notice raised. On
    /// failure the cart is kept; see [`OrderFormErrors::from_error`].
    pub async fn submit(&self, customer: &OptionRef) -> Result<Reply<Value>, CoreError> {
        let form = self.order_form(customer)?;
        let reply = self
            .inner
            .api
            .create(&Resource::ORDERS, Body::Form(form))
            .await
            .map_err(|e| self.inner.router.reject(e))?;

        self.clear();
        info!(customer = %customer.label, "order submitted");
        self.inner.alerts.open(AlertNotice::success(
            reply.message.clone().unwrap_or_else(|| "Order created".into()),
        ));
        Ok(reply)
    }

    /// Replace the cart with the items of a persisted order.
    ///
    /// Loaded items carry no product id and cannot be resubmitted. Totals
    /// are recomputed rather than taken from the server.
    pub async fn load_from_order(&self, order_id: &EntityId) -> Result<OrderDetail, CoreError> {
        if order_id.is_empty() {
            return Err(CoreError::validation("order id is required"));
        }
        self.clear();
        let ticket = self.inner.load_seq.issue();
        let result = self
            .inner
            .api
            .get::<OrderDetailRecord>(&Resource::ORDERS, &order_id.to_string())
            .await;

        if !self.inner.load_seq.is_latest(ticket) {
            debug!(%order_id, "discarding stale order load");
            return Err(CoreError::Superseded);
        }

        let order = OrderDetail::from(result.map_err(|e| self.inner.router.reject(e))?);
        let out_of_range = |e: CoreError| {
            self.inner
                .router
                .reject(CoreError::Internal(format!("order {order_id}: {e}")))
        };
        let items = order
            .items
            .iter()
            .map(|item| {
                CartLineItem::priced(
                    OptionRef::label_only(item.product_name.clone()),
                    item.product_price,
                    item.product_quantity,
                    item.product_discount,
                )
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(out_of_range)?;
        sum_totals(&items).map_err(out_of_range)?;
        self.inner.items.replace_all(items);
        Ok(order)
    }

    fn order_form(&self, customer: &OptionRef) -> Result<FormPayload, CoreError> {
        let customer_id = customer
            .id
            .as_ref()
            .filter(|_| customer.has_id())
            .ok_or_else(|| CoreError::validation("Please select a customer"))?;

        let items = self.items();
        if items.is_empty() {
            return Err(CoreError::validation("Please add at least one product"));
        }

        let mut form = FormPayload::new().text("customer_id", customer_id);
        for (i, item) in items.iter().enumerate() {
            let product_id = item
                .product
                .id
                .as_ref()
                .filter(|_| item.product.has_id())
                .ok_or_else(|| CoreError::validation(SELECT_PRODUCT_HINT))?;
            form = form
                .text(format!("products[{i}][product_id]"), product_id)
                .text(format!("products[{i}][quantity]"), item.quantity)
                .text(format!("products[{i}][discount]"), item.discount);
        }
        Ok(form)
    }
}

// ── Form error distribution ──────────────────────────────────────────

/// A rejected order split onto the order form's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFormErrors {
    /// Message for the customer selector.
    pub customer: Option<String>,
    /// Message for the product list; the generic hint when the server gave
    /// no product-level detail.
    pub products: Option<String>,
    /// Any other field messages.
    pub other: BTreeMap<String, String>,
}

impl OrderFormErrors {
    pub fn from_error(err: &CoreError) -> Self {
        let mut out = Self::default();
        if let Some(fields) = err.fields() {
            for (key, message) in fields {
                if key == "customer_id" || key == "customer" {
                    out.customer.get_or_insert_with(|| message.clone());
                } else if key.starts_with("products") {
                    out.products.get_or_insert_with(|| message.clone());
                } else {
                    out.other.insert(key.clone(), message.clone());
                }
            }
        }
        if out.products.is_none() {
            out.products = Some(SELECT_PRODUCT_HINT.into());
        }
        out
    }
}
