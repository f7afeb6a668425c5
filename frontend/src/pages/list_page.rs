use gasdash_shared::{
    csv_export::{export_filename, to_csv, CsvRow},
    BulkAction, FilterCriteria, Listable, SortDirection, SortSpec,
};
use web_sys::HtmlSelectElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::{
    api::RemoteRows,
    components::{
        bulk_toolbar::BulkToolbar,
        error_banner::{BannerTone, ErrorBanner},
        list_controls::{FilterSelect, ListControls},
        loading_spinner::LoadingSpinner,
        pagination::Pagination,
    },
    hooks::{use_admin_list, use_pagination, use_settings, ListAction},
    router::Route,
    session_context::use_session,
    utils::{confirm, download_csv},
};

/// Table header; `sort` is the field a click sorts by.
pub struct Column {
    pub label: &'static str,
    pub sort: Option<&'static str>,
}

impl Column {
    pub const fn sortable(label: &'static str, field: &'static str) -> Self {
        Self {
            label,
            sort: Some(field),
        }
    }

    pub const fn plain(label: &'static str) -> Self {
        Self {
            label,
            sort: None,
        }
    }
}

/// How one entity type is presented on its list page.
pub trait AdminRow: RemoteRows + CsvRow {
    const TITLE: &'static str;
    const SEARCH_HINT: &'static str;
    /// Permission gating CSV export.
    const EXPORT_PERMISSION: &'static str;

    fn columns() -> Vec<Column>;
    fn filters() -> Vec<FilterSelect>;
    /// Values offered by the bulk and per-row status pickers.
    fn statuses() -> Vec<&'static str>;
    fn status(&self) -> &'static str;
    /// `<td>` cells after the checkbox column.
    fn cells(&self, currency: &str) -> Html;

    fn default_sort() -> Option<SortSpec> {
        Some(SortSpec::desc("created_at"))
    }

    /// "New" button target and the permission it needs.
    fn create_route() -> Option<(Route, &'static str)> {
        None
    }

    fn edit_route(&self) -> Option<Route> {
        None
    }
}

#[function_component(ListPage)]
pub fn list_page<T: AdminRow>() -> Html {
    let (session, _) = use_session();
    let settings = use_settings();
    let handle = use_admin_list::<T>(T::default_sort());
    let state = handle.state.clone();
    let list = &state.list;

    let (rows, current_page, total_pages, go_to_page) = use_pagination(
        list.view().to_vec(),
        settings.page_size,
        (list.criteria().clone(), list.sort().cloned()),
    );

    let kind = T::KIND;
    let can_update = session.can(kind.update_permission());
    let can_delete = session.can(kind.delete_permission());
    let can_export = session.can(T::EXPORT_PERMISSION);

    let dispatcher = state.dispatcher();

    let on_criteria = {
        let dispatcher = dispatcher.clone();
        Callback::from(move |criteria: FilterCriteria| {
            dispatcher.dispatch(ListAction::Criteria(criteria))
        })
    };

    let sort_by = {
        let dispatcher = dispatcher.clone();
        move |field: &'static str| {
            let dispatcher = dispatcher.clone();
            Callback::from(move |_: MouseEvent| dispatcher.dispatch(ListAction::SortBy(field)))
        }
    };

    let toggle_all = {
        let dispatcher = dispatcher.clone();
        Callback::from(move |_: Event| dispatcher.dispatch(ListAction::ToggleAll))
    };

    let toggle_row = {
        let dispatcher = dispatcher.clone();
        move |id: String| {
            let dispatcher = dispatcher.clone();
            Callback::from(move |_: Event| dispatcher.dispatch(ListAction::Toggle(id.clone())))
        }
    };

    let clear_selection =
        Callback::from(move |_: ()| dispatcher.dispatch(ListAction::ClearSelection));

    let on_set_status = {
        let run_bulk = handle.run_bulk.clone();
        Callback::from(move |status: String| run_bulk.emit(BulkAction::SetStatus(status)))
    };
    let on_delete = {
        let run_bulk = handle.run_bulk.clone();
        Callback::from(move |_: ()| run_bulk.emit(BulkAction::Delete))
    };

    let export = {
        let state = state.clone();
        Callback::from(move |_: MouseEvent| {
            let filename = export_filename(kind.noun(), chrono::Utc::now().date_naive());
            if let Err(err) = download_csv(&filename, &to_csv(state.list.view())) {
                web_sys::console::error_2(&"csv export failed".into(), &err);
            }
        })
    };

    let row_status = |id: String| {
        let run_row = handle.run_row.clone();
        Callback::from(move |event: Event| {
            if let Some(target) = event.target_dyn_into::<HtmlSelectElement>() {
                run_row.emit((id.clone(), BulkAction::SetStatus(target.value())));
            }
        })
    };

    let row_delete = |id: String| {
        let run_row = handle.run_row.clone();
        Callback::from(move |_: MouseEvent| {
            if confirm(&format!("Delete {id}? This cannot be undone.")) {
                run_row.emit((id.clone(), BulkAction::Delete));
            }
        })
    };

    let columns = T::columns();
    let sort = list.sort().cloned();
    let header = columns
        .iter()
        .map(|column| match column.sort {
            Some(field) => {
                let marker = match &sort {
                    Some(spec) if spec.field == field => match spec.direction {
                        SortDirection::Asc => " ▲",
                        SortDirection::Desc => " ▼",
                    },
                    _ => "",
                };
                html! {
                    <th scope="col">
                        <button type="button" class={classes!("font-semibold")} onclick={sort_by(field)}>
                            { format!("{}{marker}", column.label) }
                        </button>
                    </th>
                }
            },
            None => html! { <th scope="col">{ column.label }</th> },
        })
        .collect::<Html>();

    let view_len = list.view().len();
    let selected = list.selection().len();
    let all_checked = view_len > 0 && selected == view_len;
    let statuses = T::statuses();
    let busy = handle.busy;

    let body = rows
        .iter()
        .map(|row| {
            let id = row.id().to_string();
            let checked = list.selection().contains(&id);
            let current = row.status();
            html! {
                <tr key={id.clone()} class={classes!(checked.then_some("bg-[var(--primary)]/5"))}>
                    <td>
                        <input
                            type="checkbox"
                            aria-label={format!("Select {id}")}
                            checked={checked}
                            onchange={toggle_row(id.clone())}
                        />
                    </td>
                    { row.cells(&settings.currency_symbol) }
                    <td class={classes!("whitespace-nowrap", "space-x-2")}>
                        if can_update {
                            <select class={classes!("input", "text-xs")} onchange={row_status(id.clone())} disabled={busy}>
                                { for statuses.iter().map(|status| html! {
                                    <option value={*status} selected={*status == current}>
                                        { gasdash_shared::format::humanize(status) }
                                    </option>
                                }) }
                            </select>
                        }
                        if let Some(route) = row.edit_route().filter(|_| can_update) {
                            <Link<Route> to={route} classes={classes!("text-[var(--primary)]", "text-xs")}>{ "Edit" }</Link<Route>>
                        }
                        if can_delete {
                            <button type="button" class={classes!("btn-link-danger", "text-xs")} onclick={row_delete(id.clone())} disabled={busy}>
                                { "Delete" }
                            </button>
                        }
                    </td>
                </tr>
            }
        })
        .collect::<Html>();

    let create_button = T::create_route()
        .filter(|(_, permission)| session.can(permission))
        .map(|(route, _)| {
            html! {
                <Link<Route> to={route} classes={classes!("btn-primary")}>{ "New" }</Link<Route>>
            }
        })
        .unwrap_or_default();

    let reload = {
        let reload = handle.reload.clone();
        Callback::from(move |_: MouseEvent| reload.emit(()))
    };

    html! {
        <section class={classes!("space-y-4")}>
            <div class={classes!("flex", "flex-wrap", "items-center", "justify-between", "gap-3")}>
                <h1 class={classes!("text-2xl", "font-semibold")}>{ T::TITLE }</h1>
                <div class={classes!("flex", "gap-2")}>
                    { create_button }
                    if can_export {
                        <button type="button" class={classes!("btn-secondary")} onclick={export} disabled={view_len == 0}>
                            { "Export CSV" }
                        </button>
                    }
                    <button type="button" class={classes!("btn-secondary")} onclick={reload}>{ "Refresh" }</button>
                </div>
            </div>

            if let Some(message) = handle.error.clone() {
                <ErrorBanner message={message} auto_dismiss={false} on_close={handle.dismiss.clone()} />
            }
            if let Some(message) = handle.notice.clone() {
                <ErrorBanner message={message} tone={BannerTone::Success} on_close={handle.dismiss.clone()} />
            }

            <ListControls
                criteria={list.criteria().clone()}
                filters={T::filters()}
                search_placeholder={T::SEARCH_HINT}
                on_change={on_criteria}
            />

            <BulkToolbar
                selected={selected}
                noun={kind.noun()}
                statuses={statuses.clone()}
                can_update={can_update}
                can_delete={can_delete}
                busy={busy}
                on_set_status={on_set_status}
                on_delete={on_delete}
                on_clear={clear_selection}
            />

            if handle.loading {
                <LoadingSpinner />
            } else if view_len == 0 {
                <p class={classes!("py-10", "text-center", "text-[var(--muted)]")}>
                    { format!("No {} match the current filters.", kind.noun()) }
                </p>
            } else {
                <div class={classes!("overflow-x-auto", "rounded-2xl", "border", "border-[var(--border)]")}>
                    <table class={classes!("admin-table", "w-full", "text-sm")}>
                        <thead>
                            <tr>
                                <th scope="col">
                                    <input
                                        type="checkbox"
                                        aria-label="Select all rows"
                                        checked={all_checked}
                                        onchange={toggle_all}
                                    />
                                </th>
                                { header }
                                <th scope="col">{ "Actions" }</th>
                            </tr>
                        </thead>
                        <tbody>{ body }</tbody>
                    </table>
                </div>
            }

            <Pagination
                current_page={current_page}
                total_pages={total_pages}
                total_rows={Some(view_len)}
                on_page_change={go_to_page}
            />
        </section>
    }
}
