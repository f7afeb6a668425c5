//! Bulk status changes and deletions over the selected rows of an admin list.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    error::{ActionResult, ApiError},
    list_query::Listable,
    models::{
        Order, OrderStatus, Product, Subscription, SubscriptionStatus, PRODUCT_ACTIVE,
        PRODUCT_INACTIVE,
    },
    permissions::{
        AccessPolicy, ORDERS_DELETE, ORDERS_UPDATE, PRODUCTS_DELETE, PRODUCTS_UPDATE,
        SUBSCRIPTIONS_DELETE, SUBSCRIPTIONS_UPDATE,
    },
    selection::AdminList,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Orders,
    Subscriptions,
    Products,
}

impl EntityKind {
    pub fn update_permission(self) -> &'static str {
        match self {
            EntityKind::Orders => ORDERS_UPDATE,
            EntityKind::Subscriptions => SUBSCRIPTIONS_UPDATE,
            EntityKind::Products => PRODUCTS_UPDATE,
        }
    }

    pub fn delete_permission(self) -> &'static str {
        match self {
            EntityKind::Orders => ORDERS_DELETE,
            EntityKind::Subscriptions => SUBSCRIPTIONS_DELETE,
            EntityKind::Products => PRODUCTS_DELETE,
        }
    }

    /// Plural noun for messages, also the REST collection name.
    pub fn noun(self) -> &'static str {
        match self {
            EntityKind::Orders => "orders",
            EntityKind::Subscriptions => "subscriptions",
            EntityKind::Products => "products",
        }
    }

    fn singular(self) -> &'static str {
        match self {
            EntityKind::Orders => "order",
            EntityKind::Subscriptions => "subscription",
            EntityKind::Products => "product",
        }
    }

    fn count(self, n: usize) -> String {
        if n == 1 {
            format!("1 {}", self.singular())
        } else {
            format!("{n} {}", self.noun())
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkAction {
    /// Move every selected row to this status (canonical wire value).
    SetStatus(String),
    Delete,
}

impl BulkAction {
    pub fn permission(&self, kind: EntityKind) -> &'static str {
        match self {
            BulkAction::SetStatus(_) => kind.update_permission(),
            BulkAction::Delete => kind.delete_permission(),
        }
    }
}

/// Write side of the admin API used by the dispatcher.
///
/// Futures are not required to be `Send`; in the browser everything runs on
/// one event loop.
#[async_trait(?Send)]
pub trait BulkBackend {
    /// Whether a single batch call can carry `action` for `kind`.
    fn supports_batch(&self, _kind: EntityKind, _action: &BulkAction) -> bool {
        false
    }

    async fn update_status(&self, kind: EntityKind, id: &str, status: &str) -> Result<(), ApiError>;

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), ApiError>;

    async fn bulk_update_status(
        &self,
        kind: EntityKind,
        _ids: &[String],
        _status: &str,
    ) -> Result<(), ApiError> {
        Err(batch_unavailable(kind))
    }

    async fn bulk_delete(&self, kind: EntityKind, _ids: &[String]) -> Result<(), ApiError> {
        Err(batch_unavailable(kind))
    }
}

fn batch_unavailable(kind: EntityKind) -> ApiError {
    ApiError::Http {
        status: 501,
        message: format!("no batch endpoint for {kind}"),
    }
}

/// Rows the dispatcher knows how to patch after a confirmed status change.
pub trait BulkEntity: Listable + Clone {
    const KIND: EntityKind;

    /// Canonical form of `status`, or a validation error when it is outside
    /// the entity's closed set.
    fn canonical_status(status: &str) -> Result<&'static str, ApiError>;

    fn apply_status(&mut self, status: &str, at: DateTime<Utc>);
}

fn invalid_status(kind: EntityKind, status: &str) -> ApiError {
    let mut errors = crate::error::FieldErrors::new();
    errors.insert(
        "status".to_string(),
        format!("`{status}` is not a valid {} status", kind.singular()),
    );
    ApiError::Validation(errors)
}

impl BulkEntity for Order {
    const KIND: EntityKind = EntityKind::Orders;

    fn canonical_status(status: &str) -> Result<&'static str, ApiError> {
        status
            .parse::<OrderStatus>()
            .map(OrderStatus::as_str)
            .map_err(|_| invalid_status(Self::KIND, status))
    }

    fn apply_status(&mut self, status: &str, _at: DateTime<Utc>) {
        if let Ok(status) = status.parse::<OrderStatus>() {
            self.status = status;
        }
    }
}

impl BulkEntity for Subscription {
    const KIND: EntityKind = EntityKind::Subscriptions;

    fn canonical_status(status: &str) -> Result<&'static str, ApiError> {
        status
            .parse::<SubscriptionStatus>()
            .map(SubscriptionStatus::as_str)
            .map_err(|_| invalid_status(Self::KIND, status))
    }

    fn apply_status(&mut self, status: &str, at: DateTime<Utc>) {
        if let Ok(status) = status.parse::<SubscriptionStatus>() {
            Subscription::apply_status(self, status, at);
        }
    }
}

impl BulkEntity for Product {
    const KIND: EntityKind = EntityKind::Products;

    fn canonical_status(status: &str) -> Result<&'static str, ApiError> {
        match status.trim().to_ascii_lowercase().as_str() {
            PRODUCT_ACTIVE => Ok(PRODUCT_ACTIVE),
            PRODUCT_INACTIVE => Ok(PRODUCT_INACTIVE),
            _ => Err(invalid_status(Self::KIND, status)),
        }
    }

    fn apply_status(&mut self, status: &str, _at: DateTime<Utc>) {
        self.is_active = status == PRODUCT_ACTIVE;
    }
}

/// What the backend confirmed for one action, before any list is touched.
///
/// [`execute`] talks to the backend and returns this; [`BulkOutcome::apply`]
/// folds it into whatever list state is current once the calls are done.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkOutcome {
    /// Nothing changed on the server.
    Unchanged(ActionResult),
    /// The server accepted every id in `confirmed`. `stopped_at` holds the id
    /// that failed and its message when the run did not finish.
    Applied {
        status: Option<&'static str>,
        confirmed: Vec<String>,
        stopped_at: Option<(String, String)>,
    },
}

impl BulkOutcome {
    pub fn confirmed(&self) -> &[String] {
        match self {
            BulkOutcome::Unchanged(_) => &[],
            BulkOutcome::Applied {
                confirmed, ..
            } => confirmed,
        }
    }

    /// Patch (or remove) the confirmed rows and take them out of the
    /// selection. Criteria, sort and any other selected ids are left as the
    /// list has them now.
    pub fn apply<T: BulkEntity>(self, list: &mut AdminList<T>) -> ActionResult {
        let kind = T::KIND;
        match self {
            BulkOutcome::Unchanged(result) => result,
            BulkOutcome::Applied {
                status,
                confirmed,
                stopped_at,
            } => {
                let affected = apply_locally(list, &confirmed, status);
                for id in &confirmed {
                    list.deselect(id);
                }
                match stopped_at {
                    None => ActionResult::ok(success_message(kind, status, affected), affected),
                    Some((failed_id, message)) => ActionResult {
                        success: false,
                        message: format!(
                            "{} applied, stopped at {failed_id}: {message}",
                            kind.count(affected)
                        ),
                        affected,
                    },
                }
            },
        }
    }
}

/// Run `action` over the current selection of `list`.
///
/// Nothing reaches the backend when the selection is empty, the role lacks
/// the action's permission or the status value is invalid. With a batch
/// endpoint one call is made; otherwise ids are sent one at a time, each
/// awaited before the next, stopping at the first failure. Rows the backend
/// confirmed are patched (or removed) locally. The selection is cleared on
/// full success and otherwise keeps the ids that were not applied.
pub async fn dispatch<T, B>(
    policy: &AccessPolicy,
    role: &str,
    backend: &B,
    list: &mut AdminList<T>,
    action: &BulkAction,
) -> ActionResult
where
    T: BulkEntity,
    B: BulkBackend + ?Sized,
{
    let ids = list.selection().ids();
    let result = execute::<T, B>(policy, role, backend, &ids, action)
        .await
        .apply(list);
    if result.success {
        list.clear_selection();
    }
    result
}

/// Single-row variant of [`dispatch`], used by per-row action menus.
pub async fn dispatch_one<T, B>(
    policy: &AccessPolicy,
    role: &str,
    backend: &B,
    list: &mut AdminList<T>,
    id: &str,
    action: &BulkAction,
) -> ActionResult
where
    T: BulkEntity,
    B: BulkBackend + ?Sized,
{
    if list.get(id).is_none() {
        return ActionResult::from(ApiError::NotFound(id.to_string()));
    }
    execute::<T, B>(policy, role, backend, &[id.to_string()], action)
        .await
        .apply(list)
}

/// Send `action` for `ids` and report what the backend confirmed.
pub async fn execute<T, B>(
    policy: &AccessPolicy,
    role: &str,
    backend: &B,
    ids: &[String],
    action: &BulkAction,
) -> BulkOutcome
where
    T: BulkEntity,
    B: BulkBackend + ?Sized,
{
    let kind = T::KIND;
    if ids.is_empty() {
        return BulkOutcome::Unchanged(ActionResult::failed(format!(
            "No {} selected.",
            kind.noun()
        )));
    }
    if let Err(err) = policy.require(role, action.permission(kind)) {
        tracing::warn!(role, %kind, "bulk action rejected before dispatch");
        return BulkOutcome::Unchanged(ActionResult::from(err));
    }

    let status = match action {
        BulkAction::SetStatus(status) => match T::canonical_status(status) {
            Ok(status) => Some(status),
            Err(ApiError::Validation(errors)) => {
                return BulkOutcome::Unchanged(ActionResult::failed(
                    errors.into_values().next().unwrap_or_default(),
                ))
            },
            Err(err) => return BulkOutcome::Unchanged(ActionResult::from(err)),
        },
        BulkAction::Delete => None,
    };

    if backend.supports_batch(kind, action) {
        tracing::info!(%kind, count = ids.len(), "dispatching batch action");
        let outcome = match status {
            Some(status) => backend.bulk_update_status(kind, ids, status).await,
            None => backend.bulk_delete(kind, ids).await,
        };
        return match outcome {
            Ok(()) => BulkOutcome::Applied {
                status,
                confirmed: ids.to_vec(),
                stopped_at: None,
            },
            Err(err) => {
                tracing::warn!(%kind, error = %err, "batch action failed");
                BulkOutcome::Unchanged(ActionResult::from(err))
            },
        };
    }

    let mut confirmed = Vec::with_capacity(ids.len());
    let mut stopped_at = None;
    for id in ids {
        let outcome = match status {
            Some(status) => backend.update_status(kind, id, status).await,
            None => backend.delete(kind, id).await,
        };
        match outcome {
            Ok(()) => confirmed.push(id.clone()),
            Err(err) => {
                tracing::warn!(%kind, id = %id, error = %err, "bulk action stopped");
                stopped_at = Some((id.clone(), err.user_message()));
                break;
            },
        }
    }
    BulkOutcome::Applied {
        status,
        confirmed,
        stopped_at,
    }
}

fn apply_locally<T: BulkEntity>(
    list: &mut AdminList<T>,
    ids: &[String],
    status: Option<&str>,
) -> usize {
    match status {
        Some(status) => {
            let now = Utc::now();
            list.patch(ids, |item| item.apply_status(status, now))
        },
        None => list.remove_ids(ids),
    }
}

fn success_message(kind: EntityKind, status: Option<&str>, affected: usize) -> String {
    match status {
        Some(status) => format!("Updated {} to {status}.", kind.count(affected)),
        None => format!("Deleted {}.", kind.count(affected)),
    }
}
