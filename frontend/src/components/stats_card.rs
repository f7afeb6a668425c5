use yew::prelude::*;
use yew_router::prelude::*;

use crate::router::Route;

#[derive(Properties, PartialEq, Clone)]
pub struct StatsCardProps {
    pub label: AttrValue,
    pub value: String,
    #[prop_or_default]
    pub hint: Option<String>,
    /// Makes the card a link to the page behind the number.
    #[prop_or_default]
    pub route: Option<Route>,
}

#[function_component(StatsCard)]
pub fn stats_card(props: &StatsCardProps) -> Html {
    let content = html! {
        <>
            <span class={classes!("text-xs", "uppercase", "tracking-wide", "text-[var(--muted)]")}>
                { props.label.clone() }
            </span>
            <strong class={classes!("block", "text-2xl", "font-semibold")}>{ props.value.clone() }</strong>
            if let Some(hint) = props.hint.clone() {
                <span class={classes!("text-xs", "text-[var(--muted)]")}>{ hint }</span>
            }
        </>
    };
    let card = classes!("stats-card", "rounded-2xl", "border", "border-[var(--border)]", "p-4", "space-y-1");

    if let Some(route) = &props.route {
        html! {
            <Link<Route> to={route.clone()} classes={classes!(card, "hover:border-[var(--primary)]")}>
                { content }
            </Link<Route>>
        }
    } else {
        html! {
            <div class={card} role="status">
                { content }
            </div>
        }
    }
}
