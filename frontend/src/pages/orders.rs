use gasdash_shared::{
    format::{format_currency, format_date},
    permissions, Order, OrderStatus, PaymentStatus,
};
use yew::prelude::*;

use super::list_page::{AdminRow, Column, ListPage};
use crate::components::{list_controls::FilterSelect, status_badge::StatusBadge};

impl AdminRow for Order {
    const TITLE: &'static str = "Orders";
    const SEARCH_HINT: &'static str = "Reference, customer, email or product";
    const EXPORT_PERMISSION: &'static str = permissions::ORDERS_EXPORT;

    fn columns() -> Vec<Column> {
        vec![
            Column::sortable("Reference", "reference"),
            Column::sortable("Customer", "customer"),
            Column::sortable("Items", "items"),
            Column::sortable("Total", "amount"),
            Column::sortable("Payment", "payment_status"),
            Column::sortable("Status", "status"),
            Column::sortable("Placed", "created_at"),
        ]
    }

    fn filters() -> Vec<FilterSelect> {
        vec![
            FilterSelect {
                field: "status",
                label: "Status",
                options: OrderStatus::ALL.iter().map(|status| status.as_str()).collect(),
            },
            FilterSelect {
                field: "payment_status",
                label: "Payment",
                options: PaymentStatus::ALL.iter().map(|status| status.as_str()).collect(),
            },
        ]
    }

    fn statuses() -> Vec<&'static str> {
        OrderStatus::ALL.iter().map(|status| status.as_str()).collect()
    }

    fn status(&self) -> &'static str {
        self.status.as_str()
    }

    fn cells(&self, currency: &str) -> Html {
        let tracking = self
            .tracking
            .as_ref()
            .map(|tracking| format!("{} ({}%)", tracking.location, tracking.progress));
        html! {
            <>
                <td class={classes!("font-mono", "text-xs")}>{ self.reference.clone() }</td>
                <td>
                    <div>{ self.user.name.clone() }</div>
                    <div class={classes!("text-xs", "text-[var(--muted)]")}>{ self.user.email.clone() }</div>
                </td>
                <td>{ self.items.iter().map(|item| item.quantity).sum::<u32>() }</td>
                <td class={classes!("whitespace-nowrap")}>{ format_currency(self.total_amount, currency) }</td>
                <td><StatusBadge status={self.payment_status.as_str()} /></td>
                <td>
                    <StatusBadge status={self.status.as_str()} />
                    if let Some(tracking) = tracking {
                        <div class={classes!("text-xs", "text-[var(--muted)]")}>{ tracking }</div>
                    }
                </td>
                <td class={classes!("whitespace-nowrap")}>{ format_date(&self.created_at) }</td>
            </>
        }
    }
}

#[function_component(OrdersPage)]
pub fn orders_page() -> Html {
    html! { <ListPage<Order> /> }
}
