use gasdash_shared::{permissions, AdminSettings, FieldErrors};
use yew::prelude::*;

use crate::{
    api::BrowserBackend,
    components::{
        error_banner::{BannerTone, ErrorBanner},
        form_field::{FieldKind, FormField},
    },
    hooks::use_settings,
    session_context::use_session,
    utils::report_error,
};

/// Apply one edited input to a copy of the settings. Unparseable numbers
/// become values `validate` rejects.
fn apply(settings: &AdminSettings, field: &str, value: &str) -> AdminSettings {
    let mut next = settings.clone();
    let value = value.trim();
    match field {
        "currency_symbol" => next.currency_symbol = value.to_string(),
        "default_delivery_fee" => next.default_delivery_fee = value.parse().unwrap_or(f64::NAN),
        "low_stock_threshold" => next.low_stock_threshold = value.parse().unwrap_or_default(),
        "page_size" => next.page_size = value.parse().unwrap_or_default(),
        _ => {},
    }
    next
}

#[function_component(SettingsPage)]
pub fn settings_page() -> Html {
    let (session, session_ctx) = use_session();
    let saved = use_settings();
    let draft = use_state(|| (*saved).clone());
    let errors = use_state(FieldErrors::new);
    let saving = use_state(|| false);
    let banner = use_state(|| None::<(BannerTone, String)>);
    let can_edit = session.can(permissions::SETTINGS_UPDATE);

    {
        let draft = draft.clone();
        use_effect_with((*saved).clone(), move |loaded| {
            draft.set(loaded.clone());
            || ()
        });
    }

    let on_input = {
        let draft = draft.clone();
        let errors = errors.clone();
        Callback::from(move |(field, value): (&'static str, String)| {
            draft.set(apply(&draft, field, &value));
            let mut next = (*errors).clone();
            next.remove(field);
            errors.set(next);
        })
    };

    let on_submit = {
        let draft = draft.clone();
        let saved = saved.clone();
        let errors = errors.clone();
        let saving = saving.clone();
        let banner = banner.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let invalid = draft.validate();
            if !invalid.is_empty() {
                errors.set(invalid);
                return;
            }
            let backend = BrowserBackend::new(session.clone());
            let settings = (*draft).clone();
            let saved = saved.clone();
            let saving = saving.clone();
            let banner = banner.clone();
            let session_ctx = session_ctx.clone();
            saving.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                match backend.save_settings(&settings).await {
                    Ok(stored) => {
                        saved.set(stored);
                        banner.set(Some((BannerTone::Success, "Settings saved.".to_string())));
                    },
                    Err(err) => {
                        let message = report_error("failed to save settings", &err, session_ctx.as_ref());
                        banner.set(Some((BannerTone::Error, message)));
                    },
                }
                saving.set(false);
            });
        })
    };

    let field = |name: &'static str, label: &'static str, value: String| {
        html! {
            <FormField
                name={name}
                label={label}
                value={value}
                kind={if name == "currency_symbol" { FieldKind::Text } else { FieldKind::Number }}
                required=true
                error={errors.get(name).cloned()}
                disabled={!can_edit || *saving}
                on_input={on_input.clone()}
            />
        }
    };

    let close_banner = {
        let banner = banner.clone();
        Callback::from(move |_: ()| banner.set(None))
    };

    html! {
        <section class={classes!("mx-auto", "max-w-xl", "space-y-4")}>
            <h1 class={classes!("text-2xl", "font-semibold")}>{ "Settings" }</h1>
            if let Some((tone, message)) = (*banner).clone() {
                <ErrorBanner message={message} tone={tone} on_close={close_banner} />
            }
            <form class={classes!("space-y-4")} onsubmit={on_submit} novalidate=true>
                { field("currency_symbol", "Currency symbol", draft.currency_symbol.clone()) }
                { field("default_delivery_fee", "Default delivery fee", draft.default_delivery_fee.to_string()) }
                { field("low_stock_threshold", "Low-stock threshold", draft.low_stock_threshold.to_string()) }
                { field("page_size", "Rows per page", draft.page_size.to_string()) }
                if can_edit {
                    <div class={classes!("flex", "justify-end")}>
                        <button type="submit" class={classes!("btn-primary")} disabled={*saving}>
                            { if *saving { "Saving..." } else { "Save settings" } }
                        </button>
                    </div>
                }
            </form>
        </section>
    }
}

