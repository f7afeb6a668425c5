use gasdash_shared::format::humanize;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct StatusBadgeProps {
    /// Canonical status value such as `in-transit` or `paused`.
    pub status: AttrValue,
}

fn tone(status: &str) -> &'static str {
    match status {
        "delivered" | "active" | "completed" => "bg-emerald-100 text-emerald-800",
        "processing" | "pending" => "bg-amber-100 text-amber-800",
        "in-transit" => "bg-sky-100 text-sky-800",
        "paused" | "inactive" => "bg-slate-200 text-slate-700",
        "cancelled" | "expired" | "failed" => "bg-red-100 text-red-800",
        _ => "bg-slate-100 text-slate-700",
    }
}

#[function_component(StatusBadge)]
pub fn status_badge(props: &StatusBadgeProps) -> Html {
    html! {
        <span class={classes!("inline-flex", "rounded-full", "px-2.5", "py-0.5", "text-xs", "font-medium", tone(&props.status))}>
            { humanize(&props.status) }
        </span>
    }
}
