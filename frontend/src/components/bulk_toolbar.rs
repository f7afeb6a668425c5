use gasdash_shared::format::humanize;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::utils::confirm;

#[derive(Properties, PartialEq)]
pub struct BulkToolbarProps {
    pub selected: usize,
    /// Noun for the confirm prompt, e.g. "orders".
    pub noun: AttrValue,
    pub statuses: Vec<&'static str>,
    pub can_update: bool,
    pub can_delete: bool,
    pub busy: bool,
    pub on_set_status: Callback<String>,
    pub on_delete: Callback<()>,
    pub on_clear: Callback<()>,
}

/// Actions over the checked rows. Hidden while nothing is selected.
#[function_component(BulkToolbar)]
pub fn bulk_toolbar(props: &BulkToolbarProps) -> Html {
    let chosen = use_state(String::new);

    if props.selected == 0 {
        return Html::default();
    }

    let on_choose = {
        let chosen = chosen.clone();
        Callback::from(move |event: Event| {
            if let Some(target) = event.target_dyn_into::<HtmlSelectElement>() {
                chosen.set(target.value());
            }
        })
    };

    let apply = {
        let chosen = chosen.clone();
        let on_set_status = props.on_set_status.clone();
        Callback::from(move |_: MouseEvent| {
            if !chosen.is_empty() {
                on_set_status.emit((*chosen).clone());
            }
        })
    };

    let delete = {
        let on_delete = props.on_delete.clone();
        let prompt = format!("Delete {} selected {}? This cannot be undone.", props.selected, props.noun);
        Callback::from(move |_: MouseEvent| {
            if confirm(&prompt) {
                on_delete.emit(());
            }
        })
    };

    let clear = {
        let on_clear = props.on_clear.clone();
        Callback::from(move |_: MouseEvent| on_clear.emit(()))
    };

    html! {
        <div class={classes!("flex", "flex-wrap", "items-center", "gap-3", "rounded-xl", "bg-[var(--primary)]/10", "px-4", "py-2", "text-sm")}>
            <strong>{ format!("{} selected", props.selected) }</strong>
            if props.can_update {
                <>
                <select class={classes!("input")} onchange={on_choose} disabled={props.busy}>
                    <option value="" selected={chosen.is_empty()}>{ "Change status…" }</option>
                    { for props.statuses.iter().map(|status| html! {
                        <option value={*status} selected={*chosen == *status}>{ humanize(status) }</option>
                    }) }
                </select>
                <button type="button" class={classes!("btn-primary")} onclick={apply} disabled={props.busy || chosen.is_empty()}>
                    { "Apply" }
                </button>
                </>
            }
            if props.can_delete {
                <button type="button" class={classes!("btn-danger")} onclick={delete} disabled={props.busy}>
                    { "Delete" }
                </button>
            }
            <button type="button" class={classes!("btn-secondary")} onclick={clear} disabled={props.busy}>
                { "Clear selection" }
            </button>
        </div>
    }
}
