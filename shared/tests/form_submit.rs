//! Product and subscription forms submitted through the mock backend.

mod common;

use gasdash_shared::{
    AccessPolicy, AdminList, ApiError, FormState, Product, ProductDraft, SubscriptionDraft,
    SubscriptionStatus,
};

use common::{Call, MockBackend};

fn filled_product() -> FormState<ProductDraft> {
    let mut state = FormState::<ProductDraft>::create();
    state.set_field("name", "6kg Cylinder");
    state.set_field("price", "38000");
    state.set_field("stock", "12");
    state.set_field("category", "cylinders");
    state
}

#[tokio::test]
async fn invalid_draft_stays_local() {
    let backend = MockBackend::new();
    let mut state = FormState::<ProductDraft>::create();
    let mut completed = false;

    let result = state
        .submit(&AccessPolicy::standard(), "admin", &backend, |_| completed = true)
        .await;

    assert!(!result.success);
    assert!(!completed);
    assert!(backend.calls().is_empty());
    assert_eq!(state.error("name"), Some("Name is required"));
    assert!(state.error("price").is_some());
    assert!(!state.submitting);
}

#[tokio::test]
async fn created_product_is_handed_to_the_caller() {
    let backend = MockBackend::new();
    let mut state = filled_product();
    let mut list: AdminList<Product> = AdminList::new(vec![]);

    let result = state
        .submit(&AccessPolicy::standard(), "manager", &backend, |product| {
            list.upsert(product.clone())
        })
        .await;

    assert!(result.success, "{}", result.message);
    assert_eq!(result.message, "Created successfully.");
    assert_eq!(list.items().len(), 1);
    assert_eq!(list.items()[0].name, "6kg Cylinder");
    assert!(matches!(backend.calls().as_slice(), [Call::CreateProduct(p)] if p.stock == 12));
    assert!(state.errors.is_empty());
    assert_eq!(state.server_error, None);
}

#[tokio::test]
async fn role_without_create_permission_is_stopped() {
    let backend = MockBackend::new();
    let mut state = filled_product();

    let result = state
        .submit(&AccessPolicy::standard(), "support", &backend, |_| {})
        .await;

    assert!(!result.success);
    assert!(backend.calls().is_empty());
    assert_eq!(
        state.server_error.as_deref(),
        Some("You do not have permission to perform this action.")
    );
}

#[tokio::test]
async fn server_message_is_shown_and_callback_skipped() {
    let backend = MockBackend::failing_with(ApiError::Http {
        status: 409,
        message: "A product with this name already exists".to_string(),
    });
    let mut state = filled_product();
    let mut completed = false;

    let result = state
        .submit(&AccessPolicy::standard(), "admin", &backend, |_| completed = true)
        .await;

    assert!(!result.success);
    assert!(!completed);
    assert_eq!(result.message, "A product with this name already exists");
    assert_eq!(
        state.server_error.as_deref(),
        Some("A product with this name already exists")
    );
    assert_eq!(backend.calls().len(), 1);
}

#[tokio::test]
async fn editing_a_subscription_updates_in_place() {
    let backend = MockBackend::new();
    let existing = common::subscription("s7", SubscriptionStatus::Active);
    let mut list = AdminList::new(vec![existing.clone()]);
    let mut state =
        FormState::edit("s7", SubscriptionDraft::from_subscription(&existing));
    state.set_field("status", "paused");
    state.set_field("price", "16000");

    let result = state
        .submit(&AccessPolicy::standard(), "support", &backend, |sub| {
            list.upsert(sub.clone())
        })
        .await;

    assert!(result.success, "{}", result.message);
    assert_eq!(result.message, "Saved successfully.");
    assert_eq!(list.items().len(), 1);
    let saved = list.get("s7").expect("kept");
    assert_eq!(saved.status, SubscriptionStatus::Paused);
    assert_eq!(saved.price, 16000.0);
    assert!(matches!(
        backend.calls().as_slice(),
        [Call::UpdateSubscription(id, _)] if id == "s7"
    ));
}

#[tokio::test]
async fn viewer_cannot_edit_subscriptions() {
    let backend = MockBackend::new();
    let existing = common::subscription("s1", SubscriptionStatus::Active);
    let mut state =
        FormState::edit("s1", SubscriptionDraft::from_subscription(&existing));

    let result = state
        .submit(&AccessPolicy::standard(), "viewer", &backend, |_| {})
        .await;

    assert!(!result.success);
    assert!(backend.calls().is_empty());
}
