use chrono::NaiveDate;
use gasdash_shared::{format::humanize, list_query::ALL, FilterCriteria};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

/// One drop-down filter over a named field.
#[derive(Clone, PartialEq)]
pub struct FilterSelect {
    pub field: &'static str,
    pub label: &'static str,
    pub options: Vec<&'static str>,
}

#[derive(Properties, PartialEq)]
pub struct ListControlsProps {
    pub criteria: FilterCriteria,
    pub filters: Vec<FilterSelect>,
    #[prop_or_default]
    pub search_placeholder: AttrValue,
    /// Show the from/to date inputs.
    #[prop_or(true)]
    pub date_range: bool,
    pub on_change: Callback<FilterCriteria>,
}

fn parse_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

#[function_component(ListControls)]
pub fn list_controls(props: &ListControlsProps) -> Html {
    let on_search = {
        let criteria = props.criteria.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(target) = event.target_dyn_into::<HtmlInputElement>() {
                on_change.emit(criteria.clone().with_search(target.value()));
            }
        })
    };

    let date_input = |is_from: bool| {
        let criteria = props.criteria.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |event: Event| {
            let Some(target) = event.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let day = parse_day(&target.value());
            let range = criteria.date_range;
            let next = if is_from {
                criteria.clone().with_date_range(day, range.to)
            } else {
                criteria.clone().with_date_range(range.from, day)
            };
            on_change.emit(next);
        })
    };

    let clear = {
        let on_change = props.on_change.clone();
        Callback::from(move |_: MouseEvent| on_change.emit(FilterCriteria::new()))
    };

    let selects = props
        .filters
        .iter()
        .map(|filter| {
            let current = props.criteria.active_value(filter.field).unwrap_or(ALL).to_string();
            let onchange = {
                let criteria = props.criteria.clone();
                let on_change = props.on_change.clone();
                let field = filter.field;
                Callback::from(move |event: Event| {
                    if let Some(target) = event.target_dyn_into::<HtmlSelectElement>() {
                        on_change.emit(criteria.clone().with_field(field, target.value()));
                    }
                })
            };
            html! {
                <label class={classes!("flex", "flex-col", "text-xs", "gap-1")}>
                    { filter.label }
                    <select class={classes!("input")} {onchange}>
                        <option value={ALL} selected={current == ALL}>{ "All" }</option>
                        { for filter.options.iter().map(|option| html! {
                            <option value={*option} selected={current == *option}>{ humanize(option) }</option>
                        }) }
                    </select>
                </label>
            }
        })
        .collect::<Html>();

    let range = props.criteria.date_range;
    let day_value = |day: Option<NaiveDate>| day.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();

    html! {
        <div class={classes!("flex", "flex-wrap", "items-end", "gap-3")}>
            <label class={classes!("flex", "flex-1", "min-w-[14rem]", "flex-col", "text-xs", "gap-1")}>
                { "Search" }
                <input
                    type="search"
                    class={classes!("input")}
                    placeholder={props.search_placeholder.clone()}
                    value={props.criteria.search.clone()}
                    oninput={on_search}
                />
            </label>
            { selects }
            if props.date_range {
                <>
                <label class={classes!("flex", "flex-col", "text-xs", "gap-1")}>
                    { "From" }
                    <input type="date" class={classes!("input")} value={day_value(range.from)} onchange={date_input(true)} />
                </label>
                <label class={classes!("flex", "flex-col", "text-xs", "gap-1")}>
                    { "To" }
                    <input type="date" class={classes!("input")} value={day_value(range.to)} onchange={date_input(false)} />
                </label>
                </>
            }
            <button type="button" class={classes!("btn-secondary")} onclick={clear}>{ "Reset" }</button>
        </div>
    }
}
