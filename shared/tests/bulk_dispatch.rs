//! Bulk dispatcher against the in-memory backend: guards before the
//! network, batch and sequential paths, partial failure.

mod common;

use gasdash_shared::{
    dispatch, dispatch_one, execute, AccessPolicy, AdminList, ApiError, BulkAction, BulkOutcome,
    OrderStatus, Subscription, SubscriptionStatus,
};

use common::{Call, MockBackend};

#[tokio::test]
async fn empty_selection_never_reaches_the_backend() {
    let backend = MockBackend::new();
    let mut list = AdminList::new(common::orders(3));

    let result = dispatch(
        &AccessPolicy::standard(),
        "admin",
        &backend,
        &mut list,
        &BulkAction::Delete,
    )
    .await;

    assert!(!result.success);
    assert_eq!(result.message, "No orders selected.");
    assert!(backend.calls().is_empty());
    assert_eq!(list.items().len(), 3);
}

#[tokio::test]
async fn denied_role_is_rejected_before_any_call() {
    let backend = MockBackend::new();
    let mut list = AdminList::new(common::orders(5));
    list.select_all();

    let result = dispatch(
        &AccessPolicy::standard(),
        "support",
        &backend,
        &mut list,
        &BulkAction::Delete,
    )
    .await;

    assert!(!result.success);
    assert_eq!(result.message, "You do not have permission to perform this action.");
    assert!(backend.calls().is_empty());
    assert_eq!(list.items().len(), 5);
    assert_eq!(list.selection().len(), 5);
}

#[tokio::test]
async fn sequential_delete_removes_selected_rows_and_clears_selection() {
    let backend = MockBackend::new();
    let mut list = AdminList::new(common::orders(5));
    list.toggle_selected("o2");
    list.toggle_selected("o4");

    let result = dispatch(
        &AccessPolicy::standard(),
        "admin",
        &backend,
        &mut list,
        &BulkAction::Delete,
    )
    .await;

    assert!(result.success, "{}", result.message);
    assert_eq!(result.affected, 2);
    assert_eq!(result.message, "Deleted 2 orders.");
    assert_eq!(list.items().len(), 3);
    assert!(list.get("o2").is_none());
    assert!(list.get("o4").is_none());
    assert!(list.selection().is_empty());
    assert_eq!(
        backend.calls(),
        vec![
            Call::Delete {
                id: "o2".to_string()
            },
            Call::Delete {
                id: "o4".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn batch_backend_gets_a_single_call() {
    let backend = MockBackend::batching();
    let mut list = AdminList::new(common::orders(4));
    list.select_all();

    let result = dispatch(
        &AccessPolicy::standard(),
        "manager",
        &backend,
        &mut list,
        &BulkAction::SetStatus("In-Transit".to_string()),
    )
    .await;

    assert!(result.success, "{}", result.message);
    assert_eq!(result.message, "Updated 4 orders to in-transit.");
    assert_eq!(
        backend.calls(),
        vec![Call::BulkUpdateStatus {
            ids: vec!["o1".into(), "o2".into(), "o3".into(), "o4".into()],
            status: "in-transit".to_string(),
        }]
    );
    assert!(list
        .items()
        .iter()
        .all(|order| order.status == OrderStatus::InTransit));
    assert!(list.selection().is_empty());
}

#[tokio::test]
async fn failed_batch_changes_nothing_locally() {
    let backend = MockBackend::failing_with(ApiError::Server {
        status: 502,
        message: "upstream".to_string(),
    });
    backend.batch.set(true);
    let mut list = AdminList::new(common::orders(3));
    list.select_all();

    let result = dispatch(
        &AccessPolicy::standard(),
        "admin",
        &backend,
        &mut list,
        &BulkAction::Delete,
    )
    .await;

    assert!(!result.success);
    assert_eq!(result.affected, 0);
    assert_eq!(list.items().len(), 3);
    assert_eq!(list.selection().len(), 3);
}

#[tokio::test]
async fn sequential_dispatch_stops_at_first_failure() {
    let backend = MockBackend::failing_on("o3", ApiError::NotFound("o3".to_string()));
    let mut list = AdminList::new(common::orders(5));
    list.select_all();

    let result = dispatch(
        &AccessPolicy::standard(),
        "admin",
        &backend,
        &mut list,
        &BulkAction::Delete,
    )
    .await;

    assert!(!result.success);
    assert_eq!(result.affected, 2);
    assert_eq!(
        result.message,
        "2 orders applied, stopped at o3: The requested record no longer exists."
    );
    assert_eq!(backend.calls().len(), 3);
    assert_eq!(
        list.items().iter().map(|o| o.id.as_str()).collect::<Vec<_>>(),
        vec!["o3", "o4", "o5"]
    );
    assert_eq!(list.selection().ids(), vec!["o3", "o4", "o5"]);
}

#[tokio::test]
async fn invalid_status_is_reported_without_a_call() {
    let backend = MockBackend::new();
    let mut list = AdminList::new(common::orders(2));
    list.select_all();

    let result = dispatch(
        &AccessPolicy::standard(),
        "admin",
        &backend,
        &mut list,
        &BulkAction::SetStatus("shipped".to_string()),
    )
    .await;

    assert!(!result.success);
    assert_eq!(result.message, "`shipped` is not a valid order status");
    assert!(backend.calls().is_empty());
    assert_eq!(list.selection().len(), 2);
}

#[tokio::test]
async fn pausing_subscriptions_records_pause_history() {
    let backend = MockBackend::new();
    let mut list = AdminList::new(vec![
        common::subscription("s1", SubscriptionStatus::Active),
        common::subscription("s2", SubscriptionStatus::Active),
        common::subscription("s3", SubscriptionStatus::Cancelled),
    ]);
    list.toggle_selected("s1");
    list.toggle_selected("s2");

    let result = dispatch(
        &AccessPolicy::standard(),
        "support",
        &backend,
        &mut list,
        &BulkAction::SetStatus("Paused".to_string()),
    )
    .await;

    assert!(result.success, "{}", result.message);
    assert_eq!(result.message, "Updated 2 subscriptions to paused.");
    for id in ["s1", "s2"] {
        let sub = list.get(id).expect("row kept");
        assert_eq!(sub.status, SubscriptionStatus::Paused);
        assert_eq!(sub.pause_history.len(), 1);
        assert!(sub.pause_history[0].resumed_at.is_none());
    }
    assert_eq!(
        list.get("s3").map(|s| s.status),
        Some(SubscriptionStatus::Cancelled)
    );
}

#[tokio::test]
async fn single_row_action_leaves_other_selections_alone() {
    let backend = MockBackend::new();
    let mut list = AdminList::new(common::orders(3));
    list.toggle_selected("o1");

    let result = dispatch_one(
        &AccessPolicy::standard(),
        "admin",
        &backend,
        &mut list,
        "o2",
        &BulkAction::SetStatus("delivered".to_string()),
    )
    .await;

    assert!(result.success);
    assert_eq!(result.message, "Updated 1 order to delivered.");
    assert_eq!(list.get("o2").map(|o| o.status), Some(OrderStatus::Delivered));
    assert_eq!(list.selection().ids(), vec!["o1"]);

    let missing = dispatch_one(
        &AccessPolicy::standard(),
        "admin",
        &backend,
        &mut list,
        "o9",
        &BulkAction::Delete,
    )
    .await;
    assert!(!missing.success);
    assert_eq!(backend.calls().len(), 1);
}

#[tokio::test]
async fn outcome_lands_on_the_list_as_it_is_now() {
    let backend = MockBackend::new();
    let mut list = AdminList::new(vec![
        common::subscription("s1", SubscriptionStatus::Active),
        common::subscription("s2", SubscriptionStatus::Active),
        common::subscription("s3", SubscriptionStatus::Active),
    ]);
    list.toggle_selected("s1");
    list.toggle_selected("s2");
    let ids = list.selection().ids();

    let outcome = execute::<Subscription, _>(
        &AccessPolicy::standard(),
        "admin",
        &backend,
        &ids,
        &BulkAction::SetStatus("paused".to_string()),
    )
    .await;
    assert_eq!(outcome.confirmed(), ids.as_slice());

    // Edits made while the requests were in flight.
    list.set_filter("status", "active");
    list.toggle_selected("s3");

    let result = outcome.apply(&mut list);

    assert!(result.success, "{}", result.message);
    assert_eq!(result.affected, 2);
    assert_eq!(list.criteria().active_value("status"), Some("active"));
    assert_eq!(
        list.view().iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
        vec!["s3"]
    );
    assert_eq!(list.selection().ids(), vec!["s3"]);
    assert_eq!(list.get("s1").map(|s| s.status), Some(SubscriptionStatus::Paused));
}

#[tokio::test]
async fn rejected_outcome_leaves_the_list_alone() {
    let backend = MockBackend::new();
    let mut list = AdminList::new(common::orders(3));
    list.select_all();
    let ids = list.selection().ids();

    let outcome = execute::<gasdash_shared::Order, _>(
        &AccessPolicy::standard(),
        "viewer",
        &backend,
        &ids,
        &BulkAction::Delete,
    )
    .await;

    assert!(matches!(outcome, BulkOutcome::Unchanged(_)));
    assert!(outcome.confirmed().is_empty());
    let result = outcome.apply(&mut list);
    assert!(!result.success);
    assert_eq!(list.items().len(), 3);
    assert_eq!(list.selection().len(), 3);
    assert!(backend.calls().is_empty());
}
