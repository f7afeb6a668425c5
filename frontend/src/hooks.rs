use std::rc::Rc;

use gasdash_shared::{
    execute, AccessPolicy, ActionResult, AdminList, BulkAction, BulkOutcome, EntityDraft,
    FilterCriteria, FormState, Listable, Product, ProductDraft, SortSpec, Subscription,
    SubscriptionDraft,
};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::{
    api::{BrowserBackend, RemoteRows},
    router::Route,
    session_context::use_session,
    utils::report_error,
};

/// Paginate the rows a list page currently shows.
///
/// `reset_key` changes whenever the filtered view is rebuilt (new search,
/// filter or sort) and sends the table back to its first page.
///
/// ```rust
/// let (rows, page, total, go_to_page) =
///     use_pagination(list.view().to_vec(), settings.page_size, list.criteria().clone());
/// ```
#[hook]
pub fn use_pagination<T, K>(
    items: Vec<T>,
    items_per_page: usize,
    reset_key: K,
) -> (Vec<T>, usize, usize, Callback<usize>)
where
    T: Clone + PartialEq + 'static,
    K: PartialEq + 'static,
{
    let per_page = items_per_page.max(1);
    let total_pages = calculate_total_pages(items.len(), per_page);
    let current_page = use_state(|| 1usize);

    {
        let current_page = current_page.clone();
        use_effect_with(reset_key, move |_| {
            current_page.set(1);
            || ()
        });
    }

    let visible_page = clamp_page(*current_page, total_pages);
    let slice = use_memo((items, visible_page, per_page), |(items, page, per_page)| {
        let start = per_page.saturating_mul(page - 1).min(items.len());
        let end = usize::min(start + per_page, items.len());
        items[start..end].to_vec()
    });

    let go_to_page = {
        let current_page = current_page.clone();
        Callback::from(move |page: usize| current_page.set(clamp_page(page, total_pages)))
    };

    ((*slice).clone(), visible_page, total_pages, go_to_page)
}

fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.max(1).min(total_pages.max(1))
}

fn calculate_total_pages(len: usize, per_page: usize) -> usize {
    len.div_ceil(per_page.max(1)).max(1)
}

/// Rows of one admin table plus the outcome of the last action run on them.
#[derive(Clone, PartialEq)]
pub struct ListState<T> {
    pub list: AdminList<T>,
    pub last_result: Option<ActionResult>,
}

pub enum ListAction<T> {
    Loaded(Vec<T>),
    Criteria(FilterCriteria),
    SortBy(&'static str),
    Toggle(String),
    ToggleAll,
    ClearSelection,
    /// Backend answer for an action started earlier; applied to the state as
    /// it is when the answer arrives.
    Finished(BulkOutcome),
    Dismiss,
}

impl<T: RemoteRows> Reducible for ListState<T> {
    type Action = ListAction<T>;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ListAction::Loaded(rows) => next.list.replace_items(rows),
            ListAction::Criteria(criteria) => next.list.set_criteria(criteria),
            ListAction::SortBy(field) => next.list.sort_by_column(field),
            ListAction::Toggle(id) => next.list.toggle_selected(&id),
            ListAction::ToggleAll => next.list.toggle_select_all(),
            ListAction::ClearSelection => next.list.clear_selection(),
            ListAction::Finished(outcome) => {
                let result = outcome.apply(&mut next.list);
                if !result.success {
                    web_sys::console::warn_1(&result.message.clone().into());
                }
                next.last_result = Some(result);
            },
            ListAction::Dismiss => next.last_result = None,
        }
        Rc::new(next)
    }
}

/// State behind one admin list page.
pub struct AdminListHandle<T: RemoteRows> {
    pub state: UseReducerHandle<ListState<T>>,
    pub loading: bool,
    /// A bulk or row action is in flight.
    pub busy: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub reload: Callback<()>,
    /// Run an action over the selection.
    pub run_bulk: Callback<BulkAction>,
    /// Run an action on one row.
    pub run_row: Callback<(String, BulkAction)>,
    pub dismiss: Callback<()>,
}

/// Load `T` rows once per session and expose the list plus its actions.
#[hook]
pub fn use_admin_list<T: RemoteRows>(initial_sort: Option<SortSpec>) -> AdminListHandle<T> {
    let (session, session_ctx) = use_session();
    let state = use_reducer(move || {
        let mut list = AdminList::<T>::default();
        list.set_sort(initial_sort);
        ListState {
            list,
            last_result: None,
        }
    });
    let loading = use_state(|| true);
    let busy = use_state(|| false);
    let load_error = use_state(|| None::<String>);
    let generation = use_state(|| 0u32);

    {
        let dispatcher = state.dispatcher();
        let loading = loading.clone();
        let load_error = load_error.clone();
        let session = session.clone();
        let session_ctx = session_ctx.clone();
        use_effect_with((session.clone(), *generation), move |_| {
            loading.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                let backend = BrowserBackend::new(session);
                match T::fetch_all(&backend).await {
                    Ok(rows) => {
                        dispatcher.dispatch(ListAction::Loaded(rows));
                        load_error.set(None);
                    },
                    Err(err) => {
                        let context = format!("failed to load {}", T::KIND);
                        load_error.set(Some(report_error(&context, &err, session_ctx.as_ref())));
                    },
                }
                loading.set(false);
            });
            || ()
        });
    }

    let reload = {
        let generation = generation.clone();
        Callback::from(move |_: ()| generation.set(*generation + 1))
    };

    let run = {
        let dispatcher = state.dispatcher();
        let busy = busy.clone();
        let session = session.clone();
        move |ids: Vec<String>, action: BulkAction| {
            let dispatcher = dispatcher.clone();
            let busy = busy.clone();
            let role = session.role.clone();
            let backend = BrowserBackend::new(session.clone());
            busy.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                let outcome =
                    execute::<T, _>(&AccessPolicy::standard(), &role, &backend, &ids, &action)
                        .await;
                dispatcher.dispatch(ListAction::Finished(outcome));
                busy.set(false);
            });
        }
    };

    let run_bulk = {
        let state = state.clone();
        let run = run.clone();
        Callback::from(move |action: BulkAction| run(state.list.selection().ids(), action))
    };

    let run_row = Callback::from(move |(id, action): (String, BulkAction)| run(vec![id], action));

    let dismiss = {
        let dispatcher = state.dispatcher();
        let load_error = load_error.clone();
        Callback::from(move |_: ()| {
            load_error.set(None);
            dispatcher.dispatch(ListAction::Dismiss);
        })
    };

    let (notice, action_error) = match &state.last_result {
        Some(result) if result.success => (Some(result.message.clone()), None),
        Some(result) => (None, Some(result.message.clone())),
        None => (None, None),
    };

    AdminListHandle {
        state,
        loading: *loading,
        busy: *busy,
        error: (*load_error).clone().or(action_error),
        notice,
        reload,
        run_bulk,
        run_row,
        dismiss,
    }
}

/// Site settings, falling back to defaults when the backend has none.
#[hook]
pub fn use_settings() -> UseStateHandle<gasdash_shared::AdminSettings> {
    let (session, _) = use_session();
    let settings = use_state(gasdash_shared::AdminSettings::default);
    {
        let settings = settings.clone();
        use_effect_with(session, move |session| {
            let backend = BrowserBackend::new(session.clone());
            wasm_bindgen_futures::spawn_local(async move {
                match backend.fetch_settings().await {
                    Ok(loaded) => settings.set(loaded),
                    Err(err) => web_sys::console::warn_1(
                        &format!("settings unavailable, using defaults: {err}").into(),
                    ),
                }
            });
            || ()
        });
    }
    settings
}

/// Drafts an edit page can pre-fill from a loaded record.
pub trait EditableDraft: EntityDraft + PartialEq + 'static
where
    Self::Entity: RemoteRows,
{
    /// Where the page returns after a successful save.
    const LIST_ROUTE: Route;

    fn from_entity(entity: &Self::Entity) -> Self;
}

impl EditableDraft for ProductDraft {
    const LIST_ROUTE: Route = Route::Products;

    fn from_entity(entity: &Product) -> Self {
        ProductDraft::from_product(entity)
    }
}

impl EditableDraft for SubscriptionDraft {
    const LIST_ROUTE: Route = Route::Subscriptions;

    fn from_entity(entity: &Subscription) -> Self {
        SubscriptionDraft::from_subscription(entity)
    }
}

pub struct EntityFormHandle<D: EntityDraft> {
    pub state: UseStateHandle<FormState<D>>,
    /// The record to edit is still being fetched.
    pub loading: bool,
    pub load_error: Option<String>,
    pub on_input: Callback<(&'static str, String)>,
    pub on_submit: Callback<SubmitEvent>,
}

/// Create form when `id` is `None`, otherwise an edit form for that record.
#[hook]
pub fn use_entity_form<D>(id: Option<String>) -> EntityFormHandle<D>
where
    D: EditableDraft,
    D::Entity: RemoteRows,
{
    let (session, session_ctx) = use_session();
    let navigator = use_navigator();
    let state = use_state(FormState::<D>::create);
    let loading = use_state(|| id.is_some());
    let load_error = use_state(|| None::<String>);

    {
        let state = state.clone();
        let loading = loading.clone();
        let load_error = load_error.clone();
        let session = session.clone();
        use_effect_with(id, move |id| {
            if let Some(id) = id.clone() {
                let backend = BrowserBackend::new(session);
                wasm_bindgen_futures::spawn_local(async move {
                    match <D::Entity as RemoteRows>::fetch_all(&backend).await {
                        Ok(rows) => match rows.iter().find(|row| row.id() == id) {
                            Some(entity) => state.set(FormState::edit(id, D::from_entity(entity))),
                            None => load_error.set(Some(format!("`{id}` no longer exists."))),
                        },
                        Err(err) => load_error.set(Some(report_error(
                            "failed to load record",
                            &err,
                            session_ctx.as_ref(),
                        ))),
                    }
                    loading.set(false);
                });
            } else {
                state.set(FormState::create());
                loading.set(false);
            }
            || ()
        });
    }

    let on_input = {
        let state = state.clone();
        Callback::from(move |(field, value): (&'static str, String)| {
            let mut next = (*state).clone();
            next.set_field(field, &value);
            state.set(next);
        })
    };

    let on_submit = {
        let state = state.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if state.submitting {
                return;
            }
            let state = state.clone();
            let navigator = navigator.clone();
            let role = session.role.clone();
            let backend = BrowserBackend::new(session.clone());
            let mut next = (*state).clone();
            let mut pending = next.clone();
            pending.submitting = true;
            state.set(pending);
            wasm_bindgen_futures::spawn_local(async move {
                let result = next
                    .submit(&AccessPolicy::standard(), &role, &backend, |_| {})
                    .await;
                state.set(next);
                if result.success {
                    if let Some(navigator) = navigator.as_ref() {
                        navigator.push(&D::LIST_ROUTE);
                    }
                } else {
                    web_sys::console::warn_1(&result.message.into());
                }
            });
        })
    };

    EntityFormHandle {
        state,
        loading: *loading,
        load_error: (*load_error).clone(),
        on_input,
        on_submit,
    }
}
