//! Property-based tests for the list engine and bulk delete.
//!
//! - Sentinel-only criteria return the input unchanged
//! - An equality filter keeps exactly the rows with that value, in order
//! - Ascending and descending sorts are exact reverses when keys are distinct
//! - Deleting N selected rows leaves len - N rows, none of them deleted ids

mod common;

use chrono::{TimeZone, Utc};
use gasdash_shared::{
    dispatch,
    list_query::{apply_filters, query},
    AccessPolicy, AdminList, BulkAction, FilterCriteria, Listable, Order, OrderStatus, Product,
    SortSpec,
};
use proptest::prelude::*;

use common::MockBackend;

// ============================================================================
// Strategies
// ============================================================================

fn arb_status() -> impl Strategy<Value = OrderStatus> {
    prop::sample::select(OrderStatus::ALL.to_vec())
}

fn arb_orders() -> impl Strategy<Value = Vec<Order>> {
    prop::collection::vec((arb_status(), 1u32..500_000), 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(n, (status, amount))| common::order(&format!("o{n}"), status, f64::from(amount)))
            .collect()
    })
}

fn product(n: usize, price: u32) -> Product {
    Product {
        id: format!("p{n}"),
        name: format!("Item {n}"),
        description: String::new(),
        price: f64::from(price),
        stock: 5,
        category: "accessories".to_string(),
        is_active: n % 2 == 0,
        sale_price: None,
        specifications: None,
        created_at: Utc
            .with_ymd_and_hms(2026, 2, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

/// Products whose prices are pairwise distinct, in shuffled order.
fn arb_distinct_products() -> impl Strategy<Value = Vec<Product>> {
    prop::collection::hash_set(1u32..1_000_000, 0..40)
        .prop_map(|prices| prices.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
        .prop_map(|prices| {
            prices
                .into_iter()
                .enumerate()
                .map(|(n, price)| product(n, price))
                .collect()
        })
}

fn arb_sentinel() -> impl Strategy<Value = String> {
    prop_oneof![Just("all".to_string()), Just("ALL".to_string()), Just(String::new())]
}

fn ids<T: Listable>(rows: &[T]) -> Vec<String> {
    rows.iter().map(|row| row.id().to_string()).collect()
}

// ============================================================================
// Filter properties
// ============================================================================

proptest! {
    /// Property: criteria made only of sentinels keep every row in order
    #[test]
    fn prop_sentinel_criteria_are_identity(
        orders in arb_orders(),
        status in arb_sentinel(),
        payment in arb_sentinel(),
        search in "[ ]{0,3}",
    ) {
        let criteria = FilterCriteria::new()
            .with_field("status", status)
            .with_field("payment_status", payment)
            .with_search(search);
        prop_assert_eq!(apply_filters(&orders, &criteria), orders);
    }

    /// Property: an equality filter excludes every F != V and keeps every F = V
    #[test]
    fn prop_equality_filter_partitions_rows(
        orders in arb_orders(),
        wanted in arb_status(),
    ) {
        let criteria = FilterCriteria::new().with_field("status", wanted.as_str());
        let expected = orders
            .iter()
            .filter(|order| order.status == wanted)
            .cloned()
            .collect::<Vec<_>>();
        let view = apply_filters(&orders, &criteria);
        prop_assert!(view.iter().all(|order| order.status == wanted));
        prop_assert_eq!(view, expected);
    }
}

// ============================================================================
// Sort properties
// ============================================================================

proptest! {
    /// Property: with distinct keys descending is ascending reversed
    #[test]
    fn prop_desc_is_reverse_of_asc_without_ties(products in arb_distinct_products()) {
        let criteria = FilterCriteria::new();
        let asc = query(&products, &criteria, Some(&SortSpec::asc("price")));
        let mut desc = query(&products, &criteria, Some(&SortSpec::desc("price")));
        desc.reverse();
        prop_assert_eq!(ids(&asc), ids(&desc));
        prop_assert!(asc.windows(2).all(|pair| pair[0].price < pair[1].price));
    }
}

// ============================================================================
// Bulk delete
// ============================================================================

proptest! {
    /// Property: deleting N selected rows leaves len - N rows without those ids
    #[test]
    fn prop_bulk_delete_removes_exactly_the_selection(
        orders in arb_orders(),
        picks in prop::collection::vec(any::<bool>(), 40),
    ) {
        let total = orders.len();
        let mut list = AdminList::new(orders);
        let chosen = list
            .view()
            .iter()
            .zip(&picks)
            .filter(|(_, pick)| **pick)
            .map(|(order, _)| order.id.clone())
            .collect::<Vec<_>>();
        for id in &chosen {
            list.toggle_selected(id);
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        let backend = MockBackend::new();
        let result = runtime.block_on(dispatch(
            &AccessPolicy::standard(),
            "admin",
            &backend,
            &mut list,
            &BulkAction::Delete,
        ));

        if chosen.is_empty() {
            prop_assert!(!result.success);
            prop_assert_eq!(list.items().len(), total);
        } else {
            prop_assert!(result.success, "{}", result.message);
            prop_assert_eq!(result.affected, chosen.len());
            prop_assert_eq!(list.items().len(), total - chosen.len());
            prop_assert!(chosen.iter().all(|id| list.get(id).is_none()));
            prop_assert!(list.selection().is_empty());
        }
    }
}
