//! Catalog, order and subscription records as the admin backend returns them.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Error returned when a status string is outside its closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical wire spelling.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let normalized = value.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str().eq_ignore_ascii_case(normalized))
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: value.to_string(),
                    })
            }
        }
    };
}

closed_enum! {
    /// Lifecycle of a delivery subscription.
    SubscriptionStatus, "subscription status" {
        Active => "active",
        Paused => "paused",
        Cancelled => "cancelled",
        Expired => "expired",
        Pending => "pending",
    }
}

closed_enum! {
    /// Fulfilment state of an order.
    OrderStatus, "order status" {
        Processing => "processing",
        InTransit => "in-transit",
        Delivered => "delivered",
        Cancelled => "cancelled",
    }
}

closed_enum! {
    /// Payment state reported by the gateway callback.
    PaymentStatus, "payment status" {
        Pending => "pending",
        Completed => "completed",
        Failed => "failed",
    }
}

closed_enum! {
    /// How often a subscription delivers a refill.
    DeliveryFrequency, "delivery frequency" {
        Weekly => "weekly",
        BiWeekly => "bi-weekly",
        Monthly => "monthly",
        Quarterly => "quarterly",
    }
}

impl DeliveryFrequency {
    /// Average number of deliveries in a calendar month.
    pub fn deliveries_per_month(self) -> f64 {
        match self {
            DeliveryFrequency::Weekly => 52.0 / 12.0,
            DeliveryFrequency::BiWeekly => 26.0 / 12.0,
            DeliveryFrequency::Monthly => 1.0,
            DeliveryFrequency::Quarterly => 1.0 / 3.0,
        }
    }
}

/// Owner of an order or subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CustomerRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// One pause window. `resumed_at` stays empty while the subscription is paused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauseRecord {
    pub paused_at: DateTime<Utc>,
    #[serde(default)]
    pub resumed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub user: CustomerRef,
    pub plan_name: String,
    pub plan_type: String,
    pub cylinder_size: String,
    pub delivery_frequency: DeliveryFrequency,
    pub price: f64,
    pub status: SubscriptionStatus,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub pause_history: Vec<PauseRecord>,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Apply a confirmed status change, keeping the pause history in step.
    pub fn apply_status(&mut self, status: SubscriptionStatus, at: DateTime<Utc>) {
        if status == self.status {
            return;
        }
        if status == SubscriptionStatus::Paused {
            self.pause_history.push(PauseRecord {
                paused_at: at,
                resumed_at: None,
            });
        } else if self.status == SubscriptionStatus::Paused {
            if let Some(open) = self
                .pause_history
                .iter_mut()
                .rev()
                .find(|record| record.resumed_at.is_none())
            {
                open.resumed_at = Some(at);
            }
        }
        self.status = status;
    }

    /// Price spread over one month of deliveries.
    pub fn monthly_value(&self) -> f64 {
        self.price * self.delivery_frequency.deliveries_per_month()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    #[serde(default)]
    pub product_name: String,
    pub quantity: u32,
    pub price: f64,
}

/// Courier progress attached to an order once it leaves the depot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tracking {
    pub status: String,
    #[serde(default)]
    pub location: String,
    /// 0..=100
    pub progress: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub reference: String,
    pub user: CustomerRef,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    #[serde(default)]
    pub delivery_fee: f64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub tracking: Option<Tracking>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Sum of line items, excluding the delivery fee.
    pub fn items_subtotal(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.price * f64::from(item.quantity))
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProductSpecs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
}

impl ProductSpecs {
    pub fn is_empty(&self) -> bool {
        self.weight.is_none() && self.dimensions.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub stock: u32,
    pub category: String,
    pub is_active: bool,
    #[serde(default)]
    pub sale_price: Option<f64>,
    #[serde(default)]
    pub specifications: Option<ProductSpecs>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Price a customer pays right now.
    pub fn effective_price(&self) -> f64 {
        match self.sale_price {
            Some(sale) if sale > 0.0 && sale < self.price => sale,
            _ => self.price,
        }
    }
}

/// Product availability as exposed to bulk actions.
pub const PRODUCT_ACTIVE: &str = "active";
/// See [`PRODUCT_ACTIVE`].
pub const PRODUCT_INACTIVE: &str = "inactive";

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn order_status_uses_kebab_case_on_the_wire() {
        let json = serde_json::to_string(&OrderStatus::InTransit).expect("serialize");
        assert_eq!(json, "\"in-transit\"");
        assert_eq!("In-Transit".parse::<OrderStatus>(), Ok(OrderStatus::InTransit));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = "shipped".parse::<OrderStatus>().expect_err("closed set");
        assert_eq!(err.kind, "order status");
        assert!("archived".parse::<SubscriptionStatus>().is_err());
    }

    #[test]
    fn pause_then_resume_closes_the_open_window() {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
        let mut sub = Subscription {
            id: "sub-1".to_string(),
            user: CustomerRef::default(),
            plan_name: "Family".to_string(),
            plan_type: "standard".to_string(),
            cylinder_size: "12.5kg".to_string(),
            delivery_frequency: DeliveryFrequency::Monthly,
            price: 15000.0,
            status: SubscriptionStatus::Active,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: None,
            pause_history: vec![],
            created_at: created,
        };

        let paused_at = Utc.with_ymd_and_hms(2026, 2, 1, 8, 0, 0).unwrap();
        let resumed_at = Utc.with_ymd_and_hms(2026, 2, 10, 8, 0, 0).unwrap();
        sub.apply_status(SubscriptionStatus::Paused, paused_at);
        sub.apply_status(SubscriptionStatus::Paused, resumed_at);
        assert_eq!(sub.pause_history.len(), 1);

        sub.apply_status(SubscriptionStatus::Active, resumed_at);
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(sub.pause_history[0].resumed_at, Some(resumed_at));
    }

    #[test]
    fn sale_price_only_applies_when_lower() {
        let mut product = Product {
            id: "p1".to_string(),
            name: "Cylinder".to_string(),
            description: String::new(),
            price: 100.0,
            stock: 4,
            category: "cylinders".to_string(),
            is_active: true,
            sale_price: Some(80.0),
            specifications: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        };
        assert_eq!(product.effective_price(), 80.0);
        product.sale_price = Some(120.0);
        assert_eq!(product.effective_price(), 100.0);
    }
}
