use yew::prelude::*;
use yew_router::prelude::*;

use crate::router::Route;

#[derive(Properties, PartialEq)]
pub struct NotFoundProps {
    /// The page exists but the signed-in role may not open it.
    #[prop_or(false)]
    pub forbidden: bool,
}

#[function_component(NotFoundPage)]
pub fn not_found_page(props: &NotFoundProps) -> Html {
    let (title, detail) = if props.forbidden {
        ("403 - Access denied", "Your role does not have access to this page.")
    } else {
        ("404 - Page not found", "The page you asked for does not exist.")
    };
    html! {
        <section class={classes!("mx-auto", "max-w-xl", "py-16", "text-center", "space-y-3")}>
            <h2 class={classes!("text-2xl", "font-semibold")}>{ title }</h2>
            <p class={classes!("text-[var(--muted)]")}>{ detail }</p>
            <Link<Route> to={Route::Dashboard} classes={classes!("text-[var(--primary)]", "underline")}>
                { "Back to dashboard" }
            </Link<Route>>
        </section>
    }
}
