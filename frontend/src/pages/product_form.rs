use gasdash_shared::ProductDraft;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::{
    components::{
        error_banner::ErrorBanner,
        form_field::{FieldKind, FormField},
        loading_spinner::LoadingSpinner,
    },
    hooks::use_entity_form,
    router::Route,
};

#[derive(Properties, PartialEq)]
pub struct ProductFormProps {
    /// Product being edited; `None` creates a new one.
    #[prop_or_default]
    pub id: Option<String>,
}

const CATEGORIES: &[&str] = &["gas-refill", "cylinder", "accessories", "appliances"];

#[function_component(ProductFormPage)]
pub fn product_form_page(props: &ProductFormProps) -> Html {
    let form = use_entity_form::<ProductDraft>(props.id.clone());
    let state = &*form.state;
    let draft = &state.draft;

    if form.loading {
        return html! { <LoadingSpinner label="Loading product..." /> };
    }
    if let Some(message) = form.load_error.clone() {
        return html! { <ErrorBanner message={message} auto_dismiss={false} /> };
    }

    let field = |name: &'static str, label: &'static str, value: String, kind: FieldKind, required: bool| {
        html! {
            <FormField
                name={name}
                label={label}
                value={value}
                kind={kind}
                required={required}
                error={state.error(name).map(str::to_string)}
                disabled={state.submitting}
                on_input={form.on_input.clone()}
            />
        }
    };

    let mut categories = CATEGORIES
        .iter()
        .map(|category| (*category, gasdash_shared::format::humanize(category)))
        .collect::<Vec<_>>();
    categories.insert(0, ("", "Choose a category".to_string()));

    let title = if state.editing().is_some() { "Edit product" } else { "New product" };

    html! {
        <section class={classes!("mx-auto", "max-w-2xl", "space-y-4")}>
            <h1 class={classes!("text-2xl", "font-semibold")}>{ title }</h1>
            if let Some(message) = state.server_error.clone() {
                <ErrorBanner message={message} auto_dismiss={false} />
            }
            <form class={classes!("grid", "gap-4", "md:grid-cols-2")} onsubmit={form.on_submit.clone()} novalidate=true>
                { field("name", "Name", draft.name.clone(), FieldKind::Text, true) }
                { field("category", "Category", draft.category.clone(), FieldKind::Select(categories), true) }
                <div class={classes!("md:col-span-2")}>
                    { field("description", "Description", draft.description.clone(), FieldKind::TextArea, false) }
                </div>
                { field("price", "Price", draft.price.clone(), FieldKind::Number, true) }
                { field("sale_price", "Sale price", draft.sale_price.clone(), FieldKind::Number, false) }
                { field("stock", "Stock", draft.stock.clone(), FieldKind::Number, true) }
                { field("weight", "Weight (kg)", draft.weight.clone(), FieldKind::Number, false) }
                { field("dimensions", "Dimensions", draft.dimensions.clone(), FieldKind::Text, false) }
                { field("is_active", "Active", draft.is_active.to_string(), FieldKind::Checkbox, false) }
                <div class={classes!("md:col-span-2", "flex", "justify-end", "gap-3")}>
                    <Link<Route> to={Route::Products} classes={classes!("btn-secondary")}>{ "Cancel" }</Link<Route>>
                    <button type="submit" class={classes!("btn-primary")} disabled={state.submitting}>
                        { if state.submitting { "Saving..." } else { "Save product" } }
                    </button>
                </div>
            </form>
        </section>
    }
}
