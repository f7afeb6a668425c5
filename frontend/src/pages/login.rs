use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::{
    api::{BrowserBackend, API_BASE},
    components::error_banner::ErrorBanner,
    router::Route,
    session_context::{use_session, SessionAction},
};

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let (session, session_ctx) = use_session();
    let email = use_state(String::new);
    let password = use_state(String::new);
    let submitting = use_state(|| false);
    let error = use_state(|| None::<String>);

    if session.is_authenticated() {
        return html! { <Redirect<Route> to={Route::Dashboard} /> };
    }

    let bind = |handle: &UseStateHandle<String>| {
        let handle = handle.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(target) = event.target_dyn_into::<HtmlInputElement>() {
                handle.set(target.value());
            }
        })
    };

    let on_submit = {
        let email = email.clone();
        let password = password.clone();
        let submitting = submitting.clone();
        let error = error.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if email.trim().is_empty() || password.is_empty() {
                error.set(Some("Enter your email and password.".to_string()));
                return;
            }
            let backend = BrowserBackend::new(gasdash_shared::Session::anonymous(API_BASE));
            let email = (*email).clone();
            let password = (*password).clone();
            let submitting = submitting.clone();
            let error = error.clone();
            let session_ctx = session_ctx.clone();
            submitting.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                match backend.login(&email, &password).await {
                    Ok(login) => {
                        if let Some(ctx) = session_ctx.as_ref() {
                            ctx.dispatch(SessionAction::SignIn(login));
                        }
                    },
                    Err(err) => {
                        web_sys::console::warn_1(&format!("login failed: {err}").into());
                        let message = match err {
                            gasdash_shared::ApiError::Unauthorized => {
                                "Email or password is incorrect.".to_string()
                            },
                            other => other.user_message(),
                        };
                        error.set(Some(message));
                    },
                }
                submitting.set(false);
            });
        })
    };

    html! {
        <section class={classes!("mx-auto", "mt-16", "max-w-sm", "space-y-4")}>
            <h1 class={classes!("text-2xl", "font-semibold", "text-center")}>{ "Sign in" }</h1>
            if let Some(message) = (*error).clone() {
                <ErrorBanner message={message} auto_dismiss={false} />
            }
            <form class={classes!("space-y-3")} onsubmit={on_submit}>
                <label class={classes!("flex", "flex-col", "gap-1", "text-sm")}>
                    { "Email" }
                    <input type="email" class={classes!("input")} autocomplete="username" value={(*email).clone()} oninput={bind(&email)} />
                </label>
                <label class={classes!("flex", "flex-col", "gap-1", "text-sm")}>
                    { "Password" }
                    <input type="password" class={classes!("input")} autocomplete="current-password" value={(*password).clone()} oninput={bind(&password)} />
                </label>
                <button type="submit" class={classes!("btn-primary", "w-full")} disabled={*submitting}>
                    { if *submitting { "Signing in..." } else { "Sign in" } }
                </button>
            </form>
        </section>
    }
}
