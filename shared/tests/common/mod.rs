//! In-memory backend and fixtures for the integration tests.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use gasdash_shared::{
    forms::{ProductPayload, SubscriptionPayload},
    ApiError, BulkAction, BulkBackend, CustomerRef, DeliveryFrequency, EntityKind, FormBackend,
    Order, OrderStatus, PaymentStatus, Product, Subscription, SubscriptionStatus,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    UpdateStatus { id: String, status: String },
    Delete { id: String },
    BulkUpdateStatus { ids: Vec<String>, status: String },
    BulkDelete { ids: Vec<String> },
    CreateProduct(ProductPayload),
    UpdateProduct(String, ProductPayload),
    CreateSubscription(SubscriptionPayload),
    UpdateSubscription(String, SubscriptionPayload),
}

/// Records every call; fails on `fail_on` or with `fail_with` when set.
#[derive(Default)]
pub struct MockBackend {
    pub batch: Cell<bool>,
    pub fail_on: RefCell<Option<String>>,
    pub fail_with: RefCell<Option<ApiError>>,
    pub calls: RefCell<Vec<Call>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batching() -> Self {
        let backend = Self::default();
        backend.batch.set(true);
        backend
    }

    pub fn failing_on(id: &str, err: ApiError) -> Self {
        let backend = Self::default();
        *backend.fail_on.borrow_mut() = Some(id.to_string());
        *backend.fail_with.borrow_mut() = Some(err);
        backend
    }

    pub fn failing_with(err: ApiError) -> Self {
        let backend = Self::default();
        *backend.fail_with.borrow_mut() = Some(err);
        backend
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn outcome(&self, id: Option<&str>) -> Result<(), ApiError> {
        let err = self.fail_with.borrow().clone();
        match (self.fail_on.borrow().as_deref(), id, err) {
            (Some(target), Some(id), Some(err)) if target == id => Err(err),
            (None, _, Some(err)) => Err(err),
            _ => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl BulkBackend for MockBackend {
    fn supports_batch(&self, _kind: EntityKind, _action: &BulkAction) -> bool {
        self.batch.get()
    }

    async fn update_status(&self, _kind: EntityKind, id: &str, status: &str) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(Call::UpdateStatus {
            id: id.to_string(),
            status: status.to_string(),
        });
        self.outcome(Some(id))
    }

    async fn delete(&self, _kind: EntityKind, id: &str) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(Call::Delete {
            id: id.to_string(),
        });
        self.outcome(Some(id))
    }

    async fn bulk_update_status(
        &self,
        _kind: EntityKind,
        ids: &[String],
        status: &str,
    ) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(Call::BulkUpdateStatus {
            ids: ids.to_vec(),
            status: status.to_string(),
        });
        self.outcome(None)
    }

    async fn bulk_delete(&self, _kind: EntityKind, ids: &[String]) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(Call::BulkDelete {
            ids: ids.to_vec(),
        });
        self.outcome(None)
    }
}

#[async_trait(?Send)]
impl FormBackend for MockBackend {
    async fn create_product(&self, payload: &ProductPayload) -> Result<Product, ApiError> {
        self.calls
            .borrow_mut()
            .push(Call::CreateProduct(payload.clone()));
        self.outcome(None)?;
        Ok(product_from("p-new", payload))
    }

    async fn update_product(&self, id: &str, payload: &ProductPayload) -> Result<Product, ApiError> {
        self.calls
            .borrow_mut()
            .push(Call::UpdateProduct(id.to_string(), payload.clone()));
        self.outcome(Some(id))?;
        Ok(product_from(id, payload))
    }

    async fn create_subscription(
        &self,
        payload: &SubscriptionPayload,
    ) -> Result<Subscription, ApiError> {
        self.calls
            .borrow_mut()
            .push(Call::CreateSubscription(payload.clone()));
        self.outcome(None)?;
        Ok(subscription_from("s-new", payload))
    }

    async fn update_subscription(
        &self,
        id: &str,
        payload: &SubscriptionPayload,
    ) -> Result<Subscription, ApiError> {
        self.calls
            .borrow_mut()
            .push(Call::UpdateSubscription(id.to_string(), payload.clone()));
        self.outcome(Some(id))?;
        Ok(subscription_from(id, payload))
    }
}

fn product_from(id: &str, payload: &ProductPayload) -> Product {
    Product {
        id: id.to_string(),
        name: payload.name.clone(),
        description: payload.description.clone().unwrap_or_default(),
        price: payload.price,
        stock: payload.stock,
        category: payload.category.clone(),
        is_active: payload.is_active,
        sale_price: payload.sale_price,
        specifications: payload.specifications.clone(),
        created_at: Utc::now(),
    }
}

fn subscription_from(id: &str, payload: &SubscriptionPayload) -> Subscription {
    Subscription {
        id: id.to_string(),
        user: CustomerRef {
            id: payload.user_id.clone(),
            ..Default::default()
        },
        plan_name: payload.plan_name.clone(),
        plan_type: payload.plan_type.clone(),
        cylinder_size: payload.cylinder_size.clone(),
        delivery_frequency: payload.delivery_frequency,
        price: payload.price,
        status: payload.status,
        start_date: payload.start_date,
        end_date: payload.end_date,
        pause_history: vec![],
        created_at: Utc::now(),
    }
}

pub fn order(id: &str, status: OrderStatus, amount: f64) -> Order {
    Order {
        id: id.to_string(),
        reference: format!("REF-{id}"),
        user: CustomerRef {
            id: format!("u-{id}"),
            name: format!("Customer {id}"),
            email: format!("{id}@example.com"),
        },
        items: vec![],
        total_amount: amount,
        delivery_fee: 1500.0,
        status,
        payment_status: PaymentStatus::Pending,
        tracking: None,
        created_at: Utc
            .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

pub fn orders(count: usize) -> Vec<Order> {
    (1..=count)
        .map(|n| order(&format!("o{n}"), OrderStatus::Processing, 1000.0 * n as f64))
        .collect()
}

pub fn subscription(id: &str, status: SubscriptionStatus) -> Subscription {
    Subscription {
        id: id.to_string(),
        user: CustomerRef {
            id: format!("u-{id}"),
            name: format!("Customer {id}"),
            email: format!("{id}@example.com"),
        },
        plan_name: "Family Monthly".to_string(),
        plan_type: "standard".to_string(),
        cylinder_size: "12.5kg".to_string(),
        delivery_frequency: DeliveryFrequency::Monthly,
        price: 14500.0,
        status,
        start_date: NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date"),
        end_date: None,
        pause_history: vec![],
        created_at: Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}
