//! Product and subscription edit forms.
//!
//! A draft holds exactly what was typed. Validation yields a per-field error
//! map; only a clean draft is turned into a typed payload and sent.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ActionResult, ApiError, FieldErrors},
    models::{DeliveryFrequency, Product, ProductSpecs, Subscription, SubscriptionStatus},
    permissions::{
        AccessPolicy, PRODUCTS_CREATE, PRODUCTS_UPDATE, SUBSCRIPTIONS_UPDATE,
    },
};

pub const MAX_PRICE: f64 = 10_000_000.0;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Create/update endpoints the forms submit to.
#[async_trait(?Send)]
pub trait FormBackend {
    async fn create_product(&self, payload: &ProductPayload) -> Result<Product, ApiError>;

    async fn update_product(&self, id: &str, payload: &ProductPayload) -> Result<Product, ApiError>;

    async fn create_subscription(
        &self,
        payload: &SubscriptionPayload,
    ) -> Result<Subscription, ApiError>;

    async fn update_subscription(
        &self,
        id: &str,
        payload: &SubscriptionPayload,
    ) -> Result<Subscription, ApiError>;
}

/// A form's in-progress record.
#[async_trait(?Send)]
pub trait EntityDraft: Clone + Default {
    type Payload: Serialize;
    type Entity;

    const CREATE_PERMISSION: &'static str;
    const UPDATE_PERMISSION: &'static str;

    /// Input names accepted by [`EntityDraft::set_field`].
    const FIELDS: &'static [&'static str];

    fn validate(&self) -> FieldErrors;

    /// Typed payload, or the field errors that block it.
    fn to_payload(&self) -> Result<Self::Payload, FieldErrors>;

    /// Overwrite one input by field name. Unknown names are ignored.
    fn set_field(&mut self, field: &str, value: &str);

    async fn save<B: FormBackend + ?Sized>(
        backend: &B,
        id: Option<&str>,
        payload: &Self::Payload,
    ) -> Result<Self::Entity, ApiError>;
}

struct Checks {
    errors: FieldErrors,
}

impl Checks {
    fn new() -> Self {
        Self {
            errors: FieldErrors::new(),
        }
    }

    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    fn required<'a>(&mut self, field: &str, label: &str, value: &'a str) -> Option<&'a str> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.fail(field, format!("{label} is required"));
            None
        } else {
            Some(trimmed)
        }
    }

    fn length(&mut self, field: &str, label: &str, value: &str, min: usize, max: usize) {
        let count = value.trim().chars().count();
        if count < min {
            self.fail(field, format!("{label} must be at least {min} characters"));
        } else if count > max {
            self.fail(field, format!("{label} must be at most {max} characters"));
        }
    }

    fn number(&mut self, field: &str, label: &str, value: &str) -> Option<f64> {
        match value.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => Some(number),
            _ => {
                self.fail(field, format!("{label} must be a number"));
                None
            },
        }
    }

    fn positive_price(&mut self, field: &str, label: &str, value: &str) -> Option<f64> {
        let number = self.number(field, label, value)?;
        if number <= 0.0 {
            self.fail(field, format!("{label} must be greater than 0"));
            None
        } else if number > MAX_PRICE {
            self.fail(field, format!("{label} must not exceed {MAX_PRICE:.0}"));
            None
        } else {
            Some(number)
        }
    }

    fn date(&mut self, field: &str, label: &str, value: &str) -> Option<NaiveDate> {
        match NaiveDate::parse_from_str(value.trim(), DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                self.fail(field, format!("{label} must be a date (YYYY-MM-DD)"));
                None
            },
        }
    }

    fn finish(self) -> FieldErrors {
        self.errors
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    pub category: String,
    pub is_active: bool,
    pub sale_price: String,
    pub weight: String,
    pub dimensions: String,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            price: String::new(),
            stock: "0".to_string(),
            category: String::new(),
            is_active: true,
            sale_price: String::new(),
            weight: String::new(),
            dimensions: String::new(),
        }
    }
}

impl ProductDraft {
    pub fn from_product(product: &Product) -> Self {
        let specs = product.specifications.clone().unwrap_or_default();
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            stock: product.stock.to_string(),
            category: product.category.clone(),
            is_active: product.is_active,
            sale_price: product.sale_price.map(|p| p.to_string()).unwrap_or_default(),
            weight: specs.weight.map(|w| w.to_string()).unwrap_or_default(),
            dimensions: specs.dimensions.unwrap_or_default(),
        }
    }

    fn check(&self) -> (FieldErrors, Option<ProductPayload>) {
        let mut checks = Checks::new();

        let name = checks.required("name", "Name", &self.name);
        if name.is_some() {
            checks.length("name", "Name", &self.name, 2, 100);
        }
        if self.description.trim().chars().count() > 1000 {
            checks.fail("description", "Description must be at most 1000 characters");
        }
        let price = checks
            .required("price", "Price", &self.price)
            .and_then(|value| checks.positive_price("price", "Price", value));
        let stock = checks
            .required("stock", "Stock", &self.stock)
            .and_then(|value| match value.parse::<u32>() {
                Ok(stock) => Some(stock),
                Err(_) => {
                    checks.fail("stock", "Stock must be a whole number of 0 or more");
                    None
                },
            });
        let category = checks.required("category", "Category", &self.category);

        let sale_price = match non_empty(&self.sale_price) {
            None => None,
            Some(raw) => {
                let sale = checks.positive_price("sale_price", "Sale price", &raw);
                if let (Some(sale), Some(price)) = (sale, price) {
                    if sale >= price {
                        checks.fail("sale_price", "Sale price must be lower than the price");
                    }
                }
                sale
            },
        };
        let weight = match non_empty(&self.weight) {
            None => None,
            Some(raw) => match checks.number("weight", "Weight", &raw) {
                Some(weight) if weight > 0.0 => Some(weight),
                Some(_) => {
                    checks.fail("weight", "Weight must be greater than 0");
                    None
                },
                None => None,
            },
        };
        let dimensions = non_empty(&self.dimensions);
        if dimensions.as_ref().is_some_and(|d| d.chars().count() > 60) {
            checks.fail("dimensions", "Dimensions must be at most 60 characters");
        }

        let errors = checks.finish();
        if !errors.is_empty() {
            return (errors, None);
        }
        let (Some(name), Some(price), Some(stock), Some(category)) = (name, price, stock, category)
        else {
            return (errors, None);
        };
        let specs = ProductSpecs {
            weight,
            dimensions,
        };
        let payload = ProductPayload {
            name: name.to_string(),
            description: non_empty(&self.description),
            price,
            stock,
            category: category.to_string(),
            is_active: self.is_active,
            sale_price,
            specifications: (!specs.is_empty()).then_some(specs),
        };
        (errors, Some(payload))
    }
}

/// Body of `POST /products` and `PUT /products/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub stock: u32,
    pub category: String,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifications: Option<ProductSpecs>,
}

#[async_trait(?Send)]
impl EntityDraft for ProductDraft {
    type Payload = ProductPayload;
    type Entity = Product;

    const CREATE_PERMISSION: &'static str = PRODUCTS_CREATE;
    const UPDATE_PERMISSION: &'static str = PRODUCTS_UPDATE;
    const FIELDS: &'static [&'static str] = &[
        "name",
        "description",
        "price",
        "stock",
        "category",
        "is_active",
        "sale_price",
        "weight",
        "dimensions",
    ];

    fn validate(&self) -> FieldErrors {
        self.check().0
    }

    fn to_payload(&self) -> Result<ProductPayload, FieldErrors> {
        match self.check() {
            (_, Some(payload)) => Ok(payload),
            (errors, None) => Err(errors),
        }
    }

    fn set_field(&mut self, field: &str, value: &str) {
        let value = value.to_string();
        match field {
            "name" => self.name = value,
            "description" => self.description = value,
            "price" => self.price = value,
            "stock" => self.stock = value,
            "category" => self.category = value,
            "is_active" => self.is_active = matches!(value.as_str(), "true" | "on" | "1"),
            "sale_price" => self.sale_price = value,
            "weight" => self.weight = value,
            "dimensions" => self.dimensions = value,
            _ => {},
        }
    }

    async fn save<B: FormBackend + ?Sized>(
        backend: &B,
        id: Option<&str>,
        payload: &ProductPayload,
    ) -> Result<Product, ApiError> {
        match id {
            Some(id) => backend.update_product(id, payload).await,
            None => backend.create_product(payload).await,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionDraft {
    pub user_id: String,
    pub plan_name: String,
    pub plan_type: String,
    pub cylinder_size: String,
    pub delivery_frequency: String,
    pub price: String,
    pub status: String,
    pub start_date: String,
    pub end_date: String,
}

impl Default for SubscriptionDraft {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            plan_name: String::new(),
            plan_type: String::new(),
            cylinder_size: String::new(),
            delivery_frequency: DeliveryFrequency::Monthly.as_str().to_string(),
            price: String::new(),
            status: SubscriptionStatus::Pending.as_str().to_string(),
            start_date: String::new(),
            end_date: String::new(),
        }
    }
}

impl SubscriptionDraft {
    pub fn from_subscription(sub: &Subscription) -> Self {
        Self {
            user_id: sub.user.id.clone(),
            plan_name: sub.plan_name.clone(),
            plan_type: sub.plan_type.clone(),
            cylinder_size: sub.cylinder_size.clone(),
            delivery_frequency: sub.delivery_frequency.as_str().to_string(),
            price: sub.price.to_string(),
            status: sub.status.as_str().to_string(),
            start_date: sub.start_date.format(DATE_FORMAT).to_string(),
            end_date: sub
                .end_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }

    fn check(&self) -> (FieldErrors, Option<SubscriptionPayload>) {
        let mut checks = Checks::new();

        let user_id = checks.required("user_id", "Customer", &self.user_id);
        let plan_name = checks.required("plan_name", "Plan name", &self.plan_name);
        if plan_name.is_some() {
            checks.length("plan_name", "Plan name", &self.plan_name, 1, 80);
        }
        let plan_type = checks.required("plan_type", "Plan type", &self.plan_type);
        let cylinder_size = checks.required("cylinder_size", "Cylinder size", &self.cylinder_size);
        let frequency = match self.delivery_frequency.parse::<DeliveryFrequency>() {
            Ok(frequency) => Some(frequency),
            Err(_) => {
                checks.fail("delivery_frequency", "Choose a delivery frequency");
                None
            },
        };
        let price = checks
            .required("price", "Price", &self.price)
            .and_then(|value| checks.positive_price("price", "Price", value));
        let status = match self.status.parse::<SubscriptionStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                checks.fail("status", "Choose a status");
                None
            },
        };
        let start_date = checks
            .required("start_date", "Start date", &self.start_date)
            .and_then(|value| checks.date("start_date", "Start date", value));
        let end_date = match non_empty(&self.end_date) {
            None => None,
            Some(raw) => {
                let end = checks.date("end_date", "End date", &raw);
                if let (Some(end), Some(start)) = (end, start_date) {
                    if end < start {
                        checks.fail("end_date", "End date cannot be before the start date");
                    }
                }
                end
            },
        };

        let errors = checks.finish();
        if !errors.is_empty() {
            return (errors, None);
        }
        let (
            Some(user_id),
            Some(plan_name),
            Some(plan_type),
            Some(cylinder_size),
            Some(delivery_frequency),
            Some(price),
            Some(status),
            Some(start_date),
        ) = (user_id, plan_name, plan_type, cylinder_size, frequency, price, status, start_date)
        else {
            return (errors, None);
        };
        let payload = SubscriptionPayload {
            user_id: user_id.to_string(),
            plan_name: plan_name.to_string(),
            plan_type: plan_type.to_string(),
            cylinder_size: cylinder_size.to_string(),
            delivery_frequency,
            price,
            status,
            start_date,
            end_date,
        };
        (errors, Some(payload))
    }
}

/// Body of `POST /subscriptions` and `PUT /subscriptions/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPayload {
    pub user_id: String,
    pub plan_name: String,
    pub plan_type: String,
    pub cylinder_size: String,
    pub delivery_frequency: DeliveryFrequency,
    pub price: f64,
    pub status: SubscriptionStatus,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

#[async_trait(?Send)]
impl EntityDraft for SubscriptionDraft {
    type Payload = SubscriptionPayload;
    type Entity = Subscription;

    // Subscriptions are created by admins on a customer's behalf; the same
    // capability covers both.
    const CREATE_PERMISSION: &'static str = SUBSCRIPTIONS_UPDATE;
    const UPDATE_PERMISSION: &'static str = SUBSCRIPTIONS_UPDATE;
    const FIELDS: &'static [&'static str] = &[
        "user_id",
        "plan_name",
        "plan_type",
        "cylinder_size",
        "delivery_frequency",
        "price",
        "status",
        "start_date",
        "end_date",
    ];

    fn validate(&self) -> FieldErrors {
        self.check().0
    }

    fn to_payload(&self) -> Result<SubscriptionPayload, FieldErrors> {
        match self.check() {
            (_, Some(payload)) => Ok(payload),
            (errors, None) => Err(errors),
        }
    }

    fn set_field(&mut self, field: &str, value: &str) {
        let value = value.to_string();
        match field {
            "user_id" => self.user_id = value,
            "plan_name" => self.plan_name = value,
            "plan_type" => self.plan_type = value,
            "cylinder_size" => self.cylinder_size = value,
            "delivery_frequency" => self.delivery_frequency = value,
            "price" => self.price = value,
            "status" => self.status = value,
            "start_date" => self.start_date = value,
            "end_date" => self.end_date = value,
            _ => {},
        }
    }

    async fn save<B: FormBackend + ?Sized>(
        backend: &B,
        id: Option<&str>,
        payload: &SubscriptionPayload,
    ) -> Result<Subscription, ApiError> {
        match id {
            Some(id) => backend.update_subscription(id, payload).await,
            None => backend.create_subscription(payload).await,
        }
    }
}

/// Everything a form component renders from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormState<D> {
    pub draft: D,
    pub errors: FieldErrors,
    pub server_error: Option<String>,
    pub submitting: bool,
    editing: Option<String>,
}

impl<D: EntityDraft> FormState<D> {
    pub fn create() -> Self {
        Self {
            draft: D::default(),
            errors: FieldErrors::new(),
            server_error: None,
            submitting: false,
            editing: None,
        }
    }

    pub fn edit(id: impl Into<String>, draft: D) -> Self {
        Self {
            draft,
            editing: Some(id.into()),
            ..Self::create()
        }
    }

    /// Id of the record being edited; `None` for a create form.
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Update one input and drop its stale error.
    pub fn set_field(&mut self, field: &str, value: &str) {
        self.draft.set_field(field, value);
        self.errors.remove(field);
    }

    /// Validate, authorize and send the draft.
    ///
    /// Field errors and permission failures stop before the network.
    /// `on_complete` runs only after the backend accepted the record.
    pub async fn submit<B, F>(
        &mut self,
        policy: &AccessPolicy,
        role: &str,
        backend: &B,
        on_complete: F,
    ) -> ActionResult
    where
        B: FormBackend + ?Sized,
        F: FnOnce(&D::Entity),
    {
        self.server_error = None;
        let payload = match self.draft.to_payload() {
            Ok(payload) => payload,
            Err(errors) => {
                self.errors = errors;
                return ActionResult::from(ApiError::Validation(self.errors.clone()));
            },
        };
        self.errors.clear();

        let permission = match self.editing {
            Some(_) => D::UPDATE_PERMISSION,
            None => D::CREATE_PERMISSION,
        };
        if let Err(err) = policy.require(role, permission) {
            let result = ActionResult::from(&err);
            self.server_error = Some(result.message.clone());
            return result;
        }

        self.submitting = true;
        let outcome = D::save(backend, self.editing.as_deref(), &payload).await;
        self.submitting = false;
        match outcome {
            Ok(entity) => {
                on_complete(&entity);
                let verb = if self.editing.is_some() { "Saved" } else { "Created" };
                ActionResult::ok(format!("{verb} successfully."), 1)
            },
            Err(err) => {
                tracing::warn!(error = %err, "form submission failed");
                let message = match &err {
                    ApiError::Http {
                        message, ..
                    } => message.clone(),
                    other => other.user_message(),
                };
                self.server_error = Some(message.clone());
                ActionResult::failed(message)
            },
        }
    }
}
