use gasdash_shared::permissions;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::{
    router::Route,
    session_context::{use_session, SessionAction},
};

/// Navigation entries, each shown only to roles holding its permission.
fn nav_entries() -> [(&'static str, Route, &'static str); 5] {
    [
        ("Dashboard", Route::Dashboard, permissions::DASHBOARD_VIEW),
        ("Orders", Route::Orders, permissions::ORDERS_READ),
        ("Subscriptions", Route::Subscriptions, permissions::SUBSCRIPTIONS_READ),
        ("Products", Route::Products, permissions::PRODUCTS_READ),
        ("Settings", Route::Settings, permissions::SETTINGS_READ),
    ]
}

#[function_component(Header)]
pub fn header() -> Html {
    let (session, session_ctx) = use_session();
    let route = use_route::<Route>();
    let navigator = use_navigator();

    let sign_out = {
        let session_ctx = session_ctx.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(ctx) = session_ctx.as_ref() {
                ctx.dispatch(SessionAction::SignOut);
            }
            if let Some(navigator) = navigator.as_ref() {
                navigator.push(&Route::Login);
            }
        })
    };

    let links = nav_entries()
        .into_iter()
        .filter(|(_, _, permission)| session.can(permission))
        .map(|(label, target, _)| {
            let active = route.as_ref() == Some(&target);
            let classes = classes!(
                "rounded-lg",
                "px-3",
                "py-2",
                "text-sm",
                "font-medium",
                "transition-colors",
                if active {
                    "bg-[var(--primary)] text-white"
                } else {
                    "text-[var(--text)] hover:bg-black/5"
                }
            );
            html! {
                <Link<Route> to={target} classes={classes}>{ label }</Link<Route>>
            }
        })
        .collect::<Html>();

    html! {
        <header class={classes!("flex", "flex-wrap", "items-center", "gap-4", "border-b", "border-[var(--border)]", "px-4", "py-3", "md:px-8")}>
            <Link<Route> to={Route::Dashboard} classes={classes!("text-lg", "font-bold", "tracking-tight")}>
                { "GasDash Admin" }
            </Link<Route>>
            if session.is_authenticated() {
                <>
                <nav class={classes!("flex", "flex-1", "flex-wrap", "gap-1")} aria-label="Main">
                    { links }
                </nav>
                <div class={classes!("flex", "items-center", "gap-3", "text-sm")}>
                    <span>
                        { session.display_name.clone() }
                        <span class={classes!("ml-2", "rounded", "bg-black/5", "px-2", "py-0.5", "text-xs", "uppercase")}>
                            { session.role.clone() }
                        </span>
                    </span>
                    <button type="button" class={classes!("btn-secondary")} onclick={sign_out}>
                        { "Sign out" }
                    </button>
                </div>
                </>
            }
        </header>
    }
}
