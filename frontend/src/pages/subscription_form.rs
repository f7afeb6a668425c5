use gasdash_shared::{format::humanize, DeliveryFrequency, SubscriptionDraft, SubscriptionStatus};
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
pub struct SubscriptionFormProps {
    #[prop_or_default]
    pub id: Option<String>,
}

fn choices(values: impl Iterator<Item = &'static str>) -> FieldKind {
    FieldKind::Select(values.map(|value| (value, humanize(value))).collect())
}

#[function_component(SubscriptionFormPage)]
pub fn subscription_form_page(props: &SubscriptionFormProps) -> Html {
    let form = use_entity_form::<SubscriptionDraft>(props.id.clone());
    let state = &*form.state;
    let draft = &state.draft;

    if form.loading {
        return html! { <LoadingSpinner label="Loading subscription..." /> };
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

    let frequencies = choices(DeliveryFrequency::ALL.iter().map(|f| f.as_str()));
    let statuses = choices(SubscriptionStatus::ALL.iter().map(|s| s.as_str()));
    let title = if state.editing().is_some() { "Edit subscription" } else { "New subscription" };

    html! {
        <section class={classes!("mx-auto", "max-w-2xl", "space-y-4")}>
            <h1 class={classes!("text-2xl", "font-semibold")}>{ title }</h1>
            if let Some(message) = state.server_error.clone() {
                <ErrorBanner message={message} auto_dismiss={false} />
            }
            <form class={classes!("grid", "gap-4", "md:grid-cols-2")} onsubmit={form.on_submit.clone()} novalidate=true>
                { field("user_id", "Customer id", draft.user_id.clone(), FieldKind::Text, true) }
                { field("plan_name", "Plan name", draft.plan_name.clone(), FieldKind::Text, true) }
                { field("plan_type", "Plan type", draft.plan_type.clone(), FieldKind::Text, true) }
                { field("cylinder_size", "Cylinder size", draft.cylinder_size.clone(), FieldKind::Text, true) }
                { field("delivery_frequency", "Delivery frequency", draft.delivery_frequency.clone(), frequencies, true) }
                { field("price", "Price per delivery", draft.price.clone(), FieldKind::Number, true) }
                { field("start_date", "Start date", draft.start_date.clone(), FieldKind::Date, true) }
                { field("end_date", "End date", draft.end_date.clone(), FieldKind::Date, false) }
                { field("status", "Status", draft.status.clone(), statuses, true) }
                <div class={classes!("md:col-span-2", "flex", "justify-end", "gap-3")}>
                    <Link<Route> to={Route::Subscriptions} classes={classes!("btn-secondary")}>{ "Cancel" }</Link<Route>>
                    <button type="submit" class={classes!("btn-primary")} disabled={state.submitting}>
                        { if state.submitting { "Saving..." } else { "Save subscription" } }
                    </button>
                </div>
            </form>
        </section>
    }
}
