//! REST paths and request/response envelopes of the admin backend.
//!
//! Both HTTP clients (browser and CLI) build their requests from here so the
//! endpoint layout lives in one place.

use serde::{Deserialize, Serialize};

use crate::{
    bulk::{BulkAction, EntityKind},
    models::{Order, Product, Subscription, SubscriptionStatus},
};

/// HTTP verb plus path relative to the API base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    pub path: String,
}

impl Endpoint {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }
}

fn encode(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

pub fn list(kind: EntityKind) -> Endpoint {
    match kind {
        EntityKind::Orders => Endpoint::new(Method::Get, "/admin/orders"),
        EntityKind::Subscriptions => Endpoint::new(Method::Get, "/admin/subscriptions"),
        EntityKind::Products => Endpoint::new(Method::Get, "/products"),
    }
}

/// Single-row status change. Subscriptions use the dedicated lifecycle
/// routes for pause, resume and cancel.
pub fn update_status(kind: EntityKind, id: &str, status: &str) -> Endpoint {
    let id = encode(id);
    match kind {
        EntityKind::Orders => Endpoint::new(Method::Patch, format!("/admin/orders/{id}/status")),
        EntityKind::Subscriptions => match status.parse::<SubscriptionStatus>() {
            Ok(SubscriptionStatus::Paused) => {
                Endpoint::new(Method::Put, format!("/subscriptions/{id}/pause"))
            },
            Ok(SubscriptionStatus::Active) => {
                Endpoint::new(Method::Put, format!("/subscriptions/{id}/resume"))
            },
            Ok(SubscriptionStatus::Cancelled) => {
                Endpoint::new(Method::Put, format!("/subscriptions/{id}/cancel"))
            },
            _ => Endpoint::new(Method::Patch, format!("/admin/subscriptions/{id}/status")),
        },
        EntityKind::Products => Endpoint::new(Method::Put, format!("/products/{id}")),
    }
}

/// Whether the status route takes a JSON body.
pub fn status_route_has_body(kind: EntityKind, status: &str) -> bool {
    !matches!(
        (kind, status.parse::<SubscriptionStatus>()),
        (
            EntityKind::Subscriptions,
            Ok(SubscriptionStatus::Paused | SubscriptionStatus::Active | SubscriptionStatus::Cancelled)
        )
    )
}

pub fn delete(kind: EntityKind, id: &str) -> Endpoint {
    let id = encode(id);
    match kind {
        EntityKind::Orders => Endpoint::new(Method::Delete, format!("/admin/orders/{id}")),
        EntityKind::Subscriptions => {
            Endpoint::new(Method::Delete, format!("/admin/subscriptions/{id}"))
        },
        EntityKind::Products => Endpoint::new(Method::Delete, format!("/products/{id}")),
    }
}

/// Batch route for `action`, if the backend has one.
pub fn batch(kind: EntityKind, action: &BulkAction) -> Option<Endpoint> {
    match (kind, action) {
        (EntityKind::Orders, BulkAction::SetStatus(_)) => {
            Some(Endpoint::new(Method::Patch, "/admin/orders/bulk-status"))
        },
        (EntityKind::Orders, BulkAction::Delete) => {
            Some(Endpoint::new(Method::Post, "/admin/orders/bulk-delete"))
        },
        _ => None,
    }
}

pub fn create_product() -> Endpoint {
    Endpoint::new(Method::Post, "/products")
}

pub fn update_product(id: &str) -> Endpoint {
    Endpoint::new(Method::Put, format!("/products/{}", encode(id)))
}

pub fn create_subscription() -> Endpoint {
    Endpoint::new(Method::Post, "/subscriptions")
}

pub fn update_subscription(id: &str) -> Endpoint {
    Endpoint::new(Method::Put, format!("/subscriptions/{}", encode(id)))
}

pub fn settings() -> &'static str {
    "/admin/settings"
}

pub fn login() -> &'static str {
    "/auth/login"
}

/// Body for the per-row status routes. Products carry `is_active` instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StatusBody {
    Status { status: String },
    Active { is_active: bool },
}

impl StatusBody {
    pub fn for_kind(kind: EntityKind, status: &str) -> Self {
        match kind {
            EntityKind::Products => StatusBody::Active {
                is_active: status == crate::models::PRODUCT_ACTIVE,
            },
            _ => StatusBody::Status {
                status: status.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulkStatusRequest {
    pub ids: Vec<String>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulkDeleteRequest {
    pub ids: Vec<String>,
}

/// Single-record response. Some handlers wrap the record in `{"data": ..}`,
/// others return it bare.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Data { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Data {
                data,
            }
            | Envelope::Bare(data) => data,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderListResponse {
    pub orders: Vec<Order>,
    #[serde(default)]
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionListResponse {
    pub subscriptions: Vec<Subscription>,
    #[serde(default)]
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_lifecycle_routes() {
        let pause = update_status(EntityKind::Subscriptions, "s1", "paused");
        assert_eq!(pause, Endpoint::new(Method::Put, "/subscriptions/s1/pause"));
        let resume = update_status(EntityKind::Subscriptions, "s1", "active");
        assert_eq!(resume.path, "/subscriptions/s1/resume");
        let expire = update_status(EntityKind::Subscriptions, "s1", "expired");
        assert_eq!(expire, Endpoint::new(Method::Patch, "/admin/subscriptions/s1/status"));
        assert!(!status_route_has_body(EntityKind::Subscriptions, "paused"));
        assert!(status_route_has_body(EntityKind::Subscriptions, "expired"));
        assert!(status_route_has_body(EntityKind::Orders, "delivered"));
    }

    #[test]
    fn ids_are_percent_encoded() {
        let endpoint = delete(EntityKind::Products, "a/b c");
        assert_eq!(endpoint.path, "/products/a%2Fb%20c");
        let endpoint = update_subscription("é/1");
        assert_eq!(endpoint.path, "/subscriptions/%C3%A9%2F1");
    }

    #[test]
    fn product_status_body_is_a_flag() {
        let body = serde_json::to_value(StatusBody::for_kind(EntityKind::Products, "inactive"))
            .expect("serialize");
        assert_eq!(body, serde_json::json!({ "is_active": false }));
        let body = serde_json::to_value(StatusBody::for_kind(EntityKind::Orders, "delivered"))
            .expect("serialize");
        assert_eq!(body, serde_json::json!({ "status": "delivered" }));
    }

    #[test]
    fn envelope_accepts_wrapped_and_bare_records() {
        let wrapped: Envelope<crate::session::LoginResponse> =
            serde_json::from_str(r#"{"data":{"token":"t","role":"admin"}}"#).expect("wrapped");
        assert_eq!(wrapped.into_inner().role, "admin");
        let bare: Envelope<crate::session::LoginResponse> =
            serde_json::from_str(r#"{"token":"t","role":"viewer","name":"Bo"}"#).expect("bare");
        assert_eq!(bare.into_inner().name, "Bo");
    }

    #[test]
    fn only_some_actions_batch() {
        assert!(batch(EntityKind::Orders, &BulkAction::Delete).is_some());
        assert!(batch(EntityKind::Products, &BulkAction::Delete).is_none());
        assert!(batch(EntityKind::Subscriptions, &BulkAction::SetStatus("paused".into())).is_none());
    }
}
