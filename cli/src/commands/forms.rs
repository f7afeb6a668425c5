use anyhow::{anyhow, bail, Context, Result};
use gasdash_shared::{
    AccessPolicy, EntityDraft, FieldErrors, FormState, ProductDraft, SubscriptionDraft,
};
use serde::Serialize;

use super::{output::print_json, parse_pairs};
use crate::client::AdminClient;

/// Apply `--set` pairs to a form, rejecting names the form does not have.
pub fn fill<D: EntityDraft>(state: &mut FormState<D>, fields: &[String]) -> Result<()> {
    for (field, value) in parse_pairs(fields)? {
        if !D::FIELDS.contains(&field.as_str()) {
            bail!("unknown field `{field}`; expected one of: {}", D::FIELDS.join(", "));
        }
        state.set_field(&field, &value);
    }
    Ok(())
}

fn describe(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("  {field}: {message}"))
        .collect::<Vec<_>>()
        .join("\n")
}

async fn submit<D>(client: &AdminClient, mut state: FormState<D>) -> Result<()>
where
    D: EntityDraft,
    D::Entity: Serialize + Clone,
{
    let mut saved = None;
    let result = state
        .submit(&AccessPolicy::standard(), &client.session().role, client, |entity| {
            saved = Some(entity.clone())
        })
        .await;

    if !state.errors.is_empty() {
        bail!("{}\n{}", result.message, describe(&state.errors));
    }
    if !result.success {
        return Err(anyhow!(result.message)).context("save rejected");
    }
    tracing::info!("{}", result.message);
    match saved {
        Some(entity) => print_json(&entity),
        None => Ok(()),
    }
}

pub async fn create_product(client: &AdminClient, fields: &[String]) -> Result<()> {
    let mut state = FormState::<ProductDraft>::create();
    fill(&mut state, fields)?;
    submit(client, state).await
}

pub async fn update_product(client: &AdminClient, id: &str, fields: &[String]) -> Result<()> {
    let products = client.list_products().await.context("failed to fetch products")?;
    let product = products
        .iter()
        .find(|product| product.id == id)
        .ok_or_else(|| anyhow!("product `{id}` not found"))?;
    let mut state = FormState::edit(id, ProductDraft::from_product(product));
    fill(&mut state, fields)?;
    submit(client, state).await
}

pub async fn create_subscription(client: &AdminClient, fields: &[String]) -> Result<()> {
    let mut state = FormState::<SubscriptionDraft>::create();
    fill(&mut state, fields)?;
    submit(client, state).await
}

pub async fn update_subscription(client: &AdminClient, id: &str, fields: &[String]) -> Result<()> {
    let subscriptions = client
        .list_subscriptions()
        .await
        .context("failed to fetch subscriptions")?;
    let subscription = subscriptions
        .iter()
        .find(|subscription| subscription.id == id)
        .ok_or_else(|| anyhow!("subscription `{id}` not found"))?;
    let mut state = FormState::edit(id, SubscriptionDraft::from_subscription(subscription));
    fill(&mut state, fields)?;
    submit(client, state).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_sets_known_fields_and_rejects_others() {
        let mut state = FormState::<ProductDraft>::create();
        fill(&mut state, &["name=Hose".to_string(), "stock=3".to_string()]).expect("known");
        assert_eq!(state.draft.name, "Hose");
        assert_eq!(state.draft.stock, "3");

        let err = fill(&mut state, &["colour=red".to_string()]).expect_err("unknown field");
        assert!(err.to_string().contains("unknown field `colour`"));
    }
}
