//! Numbers for the dashboard cards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Order, OrderStatus, PaymentStatus, Product, Subscription, SubscriptionStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockItem {
    pub id: String,
    pub name: String,
    pub stock: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_orders: usize,
    /// Sum of order totals whose payment completed.
    pub revenue: f64,
    pub pending_payments: usize,
    pub failed_payments: usize,
    pub average_order_value: f64,
    pub orders_by_status: BTreeMap<String, usize>,
    pub active_subscriptions: usize,
    pub paused_subscriptions: usize,
    pub subscriptions_by_status: BTreeMap<String, usize>,
    /// Active subscriptions normalised to one month of deliveries.
    pub monthly_recurring_revenue: f64,
    pub active_products: usize,
    pub low_stock: Vec<LowStockItem>,
}

impl DashboardStats {
    pub fn compute(
        orders: &[Order],
        subscriptions: &[Subscription],
        products: &[Product],
        low_stock_threshold: u32,
    ) -> Self {
        let mut stats = DashboardStats {
            total_orders: orders.len(),
            ..Default::default()
        };

        for status in OrderStatus::ALL {
            stats.orders_by_status.insert(status.to_string(), 0);
        }
        let mut paid_orders = 0_usize;
        for order in orders {
            *stats
                .orders_by_status
                .entry(order.status.to_string())
                .or_default() += 1;
            match order.payment_status {
                PaymentStatus::Completed => {
                    stats.revenue += order.total_amount;
                    paid_orders += 1;
                },
                PaymentStatus::Pending => stats.pending_payments += 1,
                PaymentStatus::Failed => stats.failed_payments += 1,
            }
        }
        if paid_orders > 0 {
            stats.average_order_value = stats.revenue / paid_orders as f64;
        }

        for status in SubscriptionStatus::ALL {
            stats.subscriptions_by_status.insert(status.to_string(), 0);
        }
        for sub in subscriptions {
            *stats
                .subscriptions_by_status
                .entry(sub.status.to_string())
                .or_default() += 1;
            match sub.status {
                SubscriptionStatus::Active => {
                    stats.active_subscriptions += 1;
                    stats.monthly_recurring_revenue += sub.monthly_value();
                },
                SubscriptionStatus::Paused => stats.paused_subscriptions += 1,
                _ => {},
            }
        }

        stats.active_products = products.iter().filter(|p| p.is_active).count();
        stats.low_stock = products
            .iter()
            .filter(|p| p.is_active && p.stock <= low_stock_threshold)
            .map(|p| LowStockItem {
                id: p.id.clone(),
                name: p.name.clone(),
                stock: p.stock,
            })
            .collect();
        stats.low_stock.sort_by_key(|item| item.stock);
        stats
    }

    /// Share of orders delivered, 0..=100.
    pub fn delivery_rate(&self) -> f64 {
        if self.total_orders == 0 {
            return 0.0;
        }
        let delivered = self
            .orders_by_status
            .get(OrderStatus::Delivered.as_str())
            .copied()
            .unwrap_or(0);
        delivered as f64 * 100.0 / self.total_orders as f64
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;
    use crate::models::{CustomerRef, DeliveryFrequency};

    fn order(status: OrderStatus, payment: PaymentStatus, amount: f64) -> Order {
        Order {
            id: format!("{status}-{amount}"),
            reference: String::new(),
            user: CustomerRef::default(),
            items: vec![],
            total_amount: amount,
            delivery_fee: 0.0,
            status,
            payment_status: payment,
            tracking: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn subscription(status: SubscriptionStatus, frequency: DeliveryFrequency, price: f64) -> Subscription {
        Subscription {
            id: format!("{status}"),
            user: CustomerRef::default(),
            plan_name: "Plan".to_string(),
            plan_type: "standard".to_string(),
            cylinder_size: "6kg".to_string(),
            delivery_frequency: frequency,
            price,
            status,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: None,
            pause_history: vec![],
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn revenue_counts_completed_payments_only() {
        let orders = vec![
            order(OrderStatus::Delivered, PaymentStatus::Completed, 100.0),
            order(OrderStatus::Processing, PaymentStatus::Pending, 70.0),
            order(OrderStatus::Cancelled, PaymentStatus::Failed, 30.0),
            order(OrderStatus::Delivered, PaymentStatus::Completed, 50.0),
        ];
        let stats = DashboardStats::compute(&orders, &[], &[], 5);
        assert_eq!(stats.revenue, 150.0);
        assert_eq!(stats.average_order_value, 75.0);
        assert_eq!(stats.pending_payments, 1);
        assert_eq!(stats.failed_payments, 1);
        assert_eq!(stats.orders_by_status.get("delivered"), Some(&2));
        assert_eq!(stats.orders_by_status.get("in-transit"), Some(&0));
        assert_eq!(stats.delivery_rate(), 50.0);
    }

    #[test]
    fn recurring_revenue_normalises_frequency() {
        let subs = vec![
            subscription(SubscriptionStatus::Active, DeliveryFrequency::Monthly, 100.0),
            subscription(SubscriptionStatus::Active, DeliveryFrequency::Quarterly, 300.0),
            subscription(SubscriptionStatus::Paused, DeliveryFrequency::Weekly, 50.0),
        ];
        let stats = DashboardStats::compute(&[], &subs, &[], 5);
        assert_eq!(stats.active_subscriptions, 2);
        assert_eq!(stats.paused_subscriptions, 1);
        assert!((stats.monthly_recurring_revenue - 200.0).abs() < 1e-9);
    }

    #[test]
    fn low_stock_lists_active_products_at_or_under_threshold() {
        let product = |id: &str, stock: u32, is_active: bool| Product {
            id: id.to_string(),
            name: id.to_uppercase(),
            description: String::new(),
            price: 1000.0,
            stock,
            category: "refills".to_string(),
            is_active,
            sale_price: None,
            specifications: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        };
        let products = vec![
            product("a", 10, true),
            product("b", 2, true),
            product("c", 0, false),
            product("d", 11, true),
        ];
        let stats = DashboardStats::compute(&[], &[], &products, 10);
        assert_eq!(stats.active_products, 3);
        assert_eq!(
            stats.low_stock.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(),
            vec!["b", "a"]
        );
    }

    #[test]
    fn empty_inputs_give_zeroes() {
        let stats = DashboardStats::compute(&[], &[], &[], 5);
        assert_eq!(stats.total_orders, 0);
        assert_eq!(stats.delivery_rate(), 0.0);
        assert!(stats.low_stock.is_empty());
    }
}
