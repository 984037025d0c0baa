// ── Generic entity store ──
//
// One store per resource type. Holds the list rows, runs CRUD calls, and
// reports every failure twice: to the error router for cross-cutting
// handling, and back to the caller for field-level display.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shopdesk_api::{ApiClient, Body, OptionRecord, Reply, Resource};
use tokio::sync::{oneshot, watch};
use tracing::{debug, info};

use super::collection::{RowCollection, Snapshot};
use crate::alert::NotificationSink;
use crate::dialog::ConfirmationGate;
use crate::error::CoreError;
use crate::model::{
    AlertNotice, Customer, EntityId, OptionRef, OrderDetail, OrderSummary, Product, ProductOption,
};
use crate::router::ErrorRouter;
use crate::sequence::RequestSequence;
use crate::stream::RowStream;

/// A resource type the generic store can manage.
pub trait Entity: Sized + Send + Sync + 'static {
    /// Wire shape of a list row.
    type Record: DeserializeOwned + Into<Self> + Send;
    /// What `get_one` returns.
    type Detail: Send;
    /// Wire shape of `get_one`'s record.
    type DetailRecord: DeserializeOwned + Into<Self::Detail> + Send;
    /// Type-ahead search hit.
    type Hit: From<OptionRecord> + Send;

    const RESOURCE: Resource;
    /// Singular noun for messages and logs.
    const KIND: &'static str;

    fn id(&self) -> &EntityId;
}

impl Entity for Customer {
    type Record = shopdesk_api::CustomerRecord;
    type Detail = Customer;
    type DetailRecord = shopdesk_api::CustomerRecord;
    type Hit = OptionRef;

    const RESOURCE: Resource = Resource::CUSTOMERS;
    const KIND: &'static str = "customer";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Entity for Product {
    type Record = shopdesk_api::ProductRecord;
    type Detail = Product;
    type DetailRecord = shopdesk_api::ProductRecord;
    type Hit = ProductOption;

    const RESOURCE: Resource = Resource::PRODUCTS;
    const KIND: &'static str = "product";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Entity for OrderSummary {
    type Record = shopdesk_api::OrderRecord;
    type Detail = OrderDetail;
    type DetailRecord = shopdesk_api::OrderDetailRecord;
    type Hit = OptionRef;

    const RESOURCE: Resource = Resource::ORDERS;
    const KIND: &'static str = "order";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Owner of one resource type's rows and CRUD operations.
pub struct EntityStore<E: Entity> {
    inner: Arc<StoreInner<E>>,
}

impl<E: Entity> Clone for EntityStore<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct StoreInner<E: Entity> {
    api: ApiClient,
    router: ErrorRouter,
    alerts: NotificationSink,
    rows: RowCollection<E>,
    list_seq: RequestSequence,
    search_seq: RequestSequence,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl<E: Entity> EntityStore<E> {
    pub(crate) fn new(api: ApiClient, router: ErrorRouter, alerts: NotificationSink) -> Self {
        let (last_refresh, _) = watch::channel(None);
        Self {
            inner: Arc::new(StoreInner {
                api,
                router,
                alerts,
                rows: RowCollection::new(),
                list_seq: RequestSequence::default(),
                search_seq: RequestSequence::default(),
                last_refresh,
            }),
        }
    }

    pub(crate) fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub(crate) fn router(&self) -> &ErrorRouter {
        &self.inner.router
    }

    pub(crate) fn alerts(&self) -> &NotificationSink {
        &self.inner.alerts
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Fetch the collection and replace the rows in server order.
    ///
    /// On failure the rows are untouched. A response that arrives after a
    /// newer `fetch_list` was issued is dropped as [`CoreError::Superseded`].
    pub async fn fetch_list(&self) -> Result<Snapshot<E>, CoreError> {
        let ticket = self.inner.list_seq.issue();
        let result = self.inner.api.list::<E::Record>(&E::RESOURCE).await;

        if !self.inner.list_seq.is_latest(ticket) {
            debug!(kind = E::KIND, ticket, "discarding stale list response");
            return Err(CoreError::Superseded);
        }

        let records = result.map_err(|e| self.inner.router.reject(e))?;
        let snap = self
            .inner
            .rows
            .replace_all(records.into_iter().map(Into::into).collect());
        self.inner.last_refresh.send_replace(Some(Utc::now()));
        info!(kind = E::KIND, count = snap.len(), "list refreshed");
        Ok(snap)
    }

    /// Fetch one record.
    pub async fn get_one(&self, id: &EntityId) -> Result<E::Detail, CoreError> {
        require_id::<E>(id)?;
        self.inner
            .api
            .get::<E::DetailRecord>(&E::RESOURCE, &id.to_string())
            .await
            .map(Into::into)
            .map_err(|e| self.inner.router.reject(e))
    }

    /// Type-ahead search. No caching; a call overtaken by a newer one
    /// resolves to [`CoreError::Superseded`].
    pub async fn search(&self, query: &str) -> Result<Vec<E::Hit>, CoreError> {
        let ticket = self.inner.search_seq.issue();
        let result = self
            .inner
            .api
            .search::<OptionRecord>(&E::RESOURCE, query)
            .await;

        if !self.inner.search_seq.is_latest(ticket) {
            debug!(kind = E::KIND, query, "discarding stale search response");
            return Err(CoreError::Superseded);
        }

        result
            .map(|hits| hits.into_iter().map(E::Hit::from).collect())
            .map_err(|e| self.inner.router.reject(e))
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Create a record. Not idempotent.
    pub async fn create(&self, body: Body) -> Result<Reply<Value>, CoreError> {
        let reply = self
            .inner
            .api
            .create(&E::RESOURCE, body)
            .await
            .map_err(|e| self.inner.router.reject(e))?;
        self.notify_success(reply.message.as_deref(), "created");
        Ok(reply)
    }

    /// Update a record. PUT or POST depending on the resource.
    pub async fn update(&self, id: &EntityId, body: Body) -> Result<Reply<Value>, CoreError> {
        require_id::<E>(id)?;
        let reply = self
            .inner
            .api
            .update(&E::RESOURCE, &id.to_string(), body)
            .await
            .map_err(|e| self.inner.router.reject(e))?;
        self.notify_success(reply.message.as_deref(), "updated");
        Ok(reply)
    }

    /// Delete a record and drop its row.
    ///
    /// UI code goes through [`request_delete`](Self::request_delete).
    pub async fn delete(&self, id: &EntityId) -> Result<Reply<Value>, CoreError> {
        require_id::<E>(id)?;
        let reply = self
            .inner
            .api
            .delete(&E::RESOURCE, &id.to_string())
            .await
            .map_err(|e| self.inner.router.reject(e))?;
        let removed = self.inner.rows.remove_where(|row| row.id().matches(id));
        debug!(kind = E::KIND, %id, removed, "row removed");
        self.notify_success(reply.message.as_deref(), "deleted");
        Ok(reply)
    }

    /// Put a delete behind the confirmation gate.
    ///
    /// The receiver yields the delete's outcome once confirmed. If the
    /// request is cancelled or replaced, the sender is dropped and the
    /// receiver reports a closed channel.
    pub fn request_delete(
        &self,
        gate: &ConfirmationGate,
        id: EntityId,
    ) -> oneshot::Receiver<Result<Reply<Value>, CoreError>> {
        let (tx, rx) = oneshot::channel();
        let store = self.clone();
        let prompt = format!("Are you sure you want to delete {} {id}?", E::KIND);
        gate.request(prompt, move || async move {
            let outcome = store.delete(&id).await;
            // Receiver may be gone; the outcome was already routed.
            let _ = tx.send(outcome);
        });
        rx
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn rows(&self) -> Snapshot<E> {
        self.inner.rows.snapshot()
    }

    /// Row with the given id, if loaded.
    pub fn find(&self, id: &EntityId) -> Option<Arc<E>> {
        self.rows().iter().find(|row| row.id().matches(id)).cloned()
    }

    pub fn subscribe(&self) -> RowStream<E> {
        RowStream::new(self.inner.rows.subscribe())
    }

    /// When the last list fetch was applied.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.inner.last_refresh.borrow()
    }

    fn notify_success(&self, message: Option<&str>, verb: &str) {
        let message =
            message.map_or_else(|| format!("{} {verb}", capitalize(E::KIND)), str::to_owned);
        self.inner.alerts.open(AlertNotice::success(message));
    }
}

fn require_id<E: Entity>(id: &EntityId) -> Result<(), CoreError> {
    if id.is_empty() {
        return Err(CoreError::validation(format!("{} id is required", E::KIND)));
    }
    Ok(())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
