use gasdash_shared::{
    format::{format_currency, format_date, humanize},
    permissions, Product, PRODUCT_ACTIVE, PRODUCT_INACTIVE,
};
use yew::prelude::*;

use super::list_page::{AdminRow, Column, ListPage};
use crate::{
    components::{list_controls::FilterSelect, status_badge::StatusBadge},
    hooks::use_settings,
    router::Route,
};

impl AdminRow for Product {
    const TITLE: &'static str = "Products";
    const SEARCH_HINT: &'static str = "Name, id or category";
    // The catalog has no export permission of its own.
    const EXPORT_PERMISSION: &'static str = permissions::PRODUCTS_READ;

    fn columns() -> Vec<Column> {
        vec![
            Column::sortable("Name", "name"),
            Column::sortable("Category", "category"),
            Column::sortable("Price", "price"),
            Column::sortable("Stock", "stock"),
            Column::sortable("Status", "status"),
            Column::sortable("Added", "created_at"),
        ]
    }

    fn filters() -> Vec<FilterSelect> {
        vec![FilterSelect {
            field: "status",
            label: "Status",
            options: Self::statuses(),
        }]
    }

    fn statuses() -> Vec<&'static str> {
        vec![PRODUCT_ACTIVE, PRODUCT_INACTIVE]
    }

    fn status(&self) -> &'static str {
        if self.is_active {
            PRODUCT_ACTIVE
        } else {
            PRODUCT_INACTIVE
        }
    }

    fn default_sort() -> Option<gasdash_shared::SortSpec> {
        Some(gasdash_shared::SortSpec::asc("name"))
    }

    fn cells(&self, currency: &str) -> Html {
        html! {
            <>
                <td>
                    <div class={classes!("font-medium")}>{ self.name.clone() }</div>
                    <div class={classes!("text-xs", "text-[var(--muted)]", "line-clamp-1")}>{ self.description.clone() }</div>
                </td>
                <td>{ humanize(&self.category) }</td>
                <td class={classes!("whitespace-nowrap")}>
                    if let Some(sale) = self.sale_price {
                        <>
                        <span class={classes!("mr-1", "line-through", "text-[var(--muted)]")}>{ format_currency(self.price, currency) }</span>
                        { format_currency(sale, currency) }
                        </>
                    } else {
                        { format_currency(self.price, currency) }
                    }
                </td>
                <td>{ self.stock }</td>
                <td><StatusBadge status={self.status()} /></td>
                <td class={classes!("whitespace-nowrap")}>{ format_date(&self.created_at) }</td>
            </>
        }
    }

    fn create_route() -> Option<(Route, &'static str)> {
        Some((Route::ProductNew, permissions::PRODUCTS_CREATE))
    }

    fn edit_route(&self) -> Option<Route> {
        Some(Route::ProductEdit {
            id: self.id.clone(),
        })
    }
}

/// Catalog table with a low-stock hint above it.
#[function_component(ProductsPage)]
pub fn products_page() -> Html {
    let settings = use_settings();
    html! {
        <>
            <p class={classes!("mb-2", "text-xs", "text-[var(--muted)]")}>
                { format!("Products at or below {} units count as low stock on the dashboard.", settings.low_stock_threshold) }
            </p>
            <ListPage<Product> />
        </>
    }
}
