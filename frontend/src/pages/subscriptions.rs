use gasdash_shared::{
    format::{format_currency, humanize},
    permissions, DeliveryFrequency, Subscription, SubscriptionStatus,
};
use yew::prelude::*;

use super::list_page::{AdminRow, Column, ListPage};
use crate::{
    components::{list_controls::FilterSelect, status_badge::StatusBadge},
    router::Route,
};

impl AdminRow for Subscription {
    const TITLE: &'static str = "Subscriptions";
    const SEARCH_HINT: &'static str = "Plan, customer or email";
    const EXPORT_PERMISSION: &'static str = permissions::SUBSCRIPTIONS_EXPORT;

    fn columns() -> Vec<Column> {
        vec![
            Column::sortable("Customer", "customer"),
            Column::sortable("Plan", "plan"),
            Column::plain("Cylinder"),
            Column::sortable("Frequency", "delivery_frequency"),
            Column::sortable("Price", "price"),
            Column::sortable("Status", "status"),
            Column::sortable("Starts", "start_date"),
            Column::sortable("Pauses", "pauses"),
        ]
    }

    fn filters() -> Vec<FilterSelect> {
        vec![
            FilterSelect {
                field: "status",
                label: "Status",
                options: Self::statuses(),
            },
            FilterSelect {
                field: "delivery_frequency",
                label: "Frequency",
                options: DeliveryFrequency::ALL.iter().map(|f| f.as_str()).collect(),
            },
        ]
    }

    fn statuses() -> Vec<&'static str> {
        SubscriptionStatus::ALL.iter().map(|status| status.as_str()).collect()
    }

    fn status(&self) -> &'static str {
        self.status.as_str()
    }

    fn default_sort() -> Option<gasdash_shared::SortSpec> {
        Some(gasdash_shared::SortSpec::desc("start_date"))
    }

    fn cells(&self, currency: &str) -> Html {
        let open_pause = self
            .pause_history
            .last()
            .filter(|pause| pause.resumed_at.is_none())
            .map(|pause| format!("since {}", pause.paused_at.format("%Y-%m-%d")));
        html! {
            <>
                <td>
                    <div>{ self.user.name.clone() }</div>
                    <div class={classes!("text-xs", "text-[var(--muted)]")}>{ self.user.email.clone() }</div>
                </td>
                <td>
                    <div>{ self.plan_name.clone() }</div>
                    <div class={classes!("text-xs", "text-[var(--muted)]")}>{ humanize(&self.plan_type) }</div>
                </td>
                <td>{ self.cylinder_size.clone() }</td>
                <td>{ humanize(self.delivery_frequency.as_str()) }</td>
                <td class={classes!("whitespace-nowrap")}>{ format_currency(self.price, currency) }</td>
                <td>
                    <StatusBadge status={self.status.as_str()} />
                    if let Some(open_pause) = open_pause {
                        <div class={classes!("text-xs", "text-[var(--muted)]")}>{ open_pause }</div>
                    }
                </td>
                <td class={classes!("whitespace-nowrap")}>
                    { self.start_date.format("%Y-%m-%d").to_string() }
                    if let Some(end) = self.end_date {
                        <div class={classes!("text-xs", "text-[var(--muted)]")}>{ format!("until {}", end.format("%Y-%m-%d")) }</div>
                    }
                </td>
                <td>{ self.pause_history.len() }</td>
            </>
        }
    }

    fn create_route() -> Option<(Route, &'static str)> {
        Some((Route::SubscriptionNew, permissions::SUBSCRIPTIONS_UPDATE))
    }

    fn edit_route(&self) -> Option<Route> {
        Some(Route::SubscriptionEdit {
            id: self.id.clone(),
        })
    }
}

#[function_component(SubscriptionsPage)]
pub fn subscriptions_page() -> Html {
    html! { <ListPage<Subscription> /> }
}
