use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use gasdash_shared::{
    csv_export::{export_filename, to_csv, CsvRow},
    dispatch, AccessPolicy, AdminList, ApiError, BulkAction, BulkEntity, Listable, Order,
    Product, Subscription,
};
use serde::Serialize;

use super::{
    criteria_from,
    output::{print_rows, TableRow},
    permission, report,
};
use crate::{
    cli::{ExportArgs, ListArgs, ListFilters, Targets},
    client::AdminClient,
};

/// Entities the CLI can list, export and bulk-edit.
#[async_trait(?Send)]
pub trait RemoteEntity: BulkEntity + CsvRow + TableRow + Serialize + Sized {
    async fn fetch_all(client: &AdminClient) -> Result<Vec<Self>, ApiError>;
}

#[async_trait(?Send)]
impl RemoteEntity for Order {
    async fn fetch_all(client: &AdminClient) -> Result<Vec<Self>, ApiError> {
        client.list_orders().await
    }
}

#[async_trait(?Send)]
impl RemoteEntity for Subscription {
    async fn fetch_all(client: &AdminClient) -> Result<Vec<Self>, ApiError> {
        client.list_subscriptions().await
    }
}

#[async_trait(?Send)]
impl RemoteEntity for Product {
    async fn fetch_all(client: &AdminClient) -> Result<Vec<Self>, ApiError> {
        client.list_products().await
    }
}

/// Fetch every row and apply the filter flags.
pub async fn load<T: RemoteEntity>(
    client: &AdminClient,
    filters: &ListFilters,
) -> Result<AdminList<T>> {
    let (criteria, sort) = criteria_from(filters)?;
    let items = T::fetch_all(client)
        .await
        .with_context(|| format!("failed to fetch {}", T::KIND))?;
    tracing::debug!(kind = %T::KIND, fetched = items.len(), "loaded rows");
    let mut list = AdminList::new(items);
    list.set_criteria(criteria);
    list.set_sort(sort);
    Ok(list)
}

pub async fn list<T: RemoteEntity>(client: &AdminClient, args: &ListArgs) -> Result<()> {
    AccessPolicy::standard().require(&client.session().role, permission(T::KIND, "read"))?;
    let list = load::<T>(client, &args.filters).await?;
    let view = list.view();
    let shown = args.limit.map_or(view.len(), |limit| limit.min(view.len()));
    print_rows(&view[..shown], args.format)
}

pub async fn export<T: RemoteEntity>(client: &AdminClient, args: &ExportArgs) -> Result<()> {
    AccessPolicy::standard().require(&client.session().role, permission(T::KIND, "export"))?;
    let list = load::<T>(client, &args.filters).await?;
    let csv = to_csv(list.view());
    match &args.output {
        None => println!("{csv}"),
        Some(output) => {
            let path = export_path(output, T::KIND.noun());
            std::fs::write(&path, format!("{csv}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Exported {} {} to {}", list.view().len(), T::KIND, path.display());
        },
    }
    Ok(())
}

/// `output` itself, or the dated default name inside it when it is a
/// directory.
pub fn export_path(output: &Path, prefix: &str) -> PathBuf {
    if output.is_dir() {
        output.join(export_filename(prefix, chrono::Local::now().date_naive()))
    } else {
        output.to_path_buf()
    }
}

pub async fn bulk<T: RemoteEntity>(
    client: &AdminClient,
    targets: &Targets,
    action: &BulkAction,
) -> Result<()> {
    let policy = AccessPolicy::standard();
    let role = client.session().role.clone();
    policy.require(&role, action.permission(T::KIND))?;

    let mut list = load::<T>(client, &targets.filters).await?;
    if targets.all_matching {
        list.select_all();
    } else {
        for id in &targets.ids {
            if !list.view().iter().any(|item| item.id() == id) {
                bail!("{} `{id}` not found under the current filters", T::KIND);
            }
            if !list.selection().contains(id) {
                list.toggle_selected(id);
            }
        }
    }
    tracing::info!(kind = %T::KIND, selected = list.selection().len(), ?action, "running bulk action");

    let result = dispatch(&policy, &role, client, &mut list, action).await;
    report(result)
}
