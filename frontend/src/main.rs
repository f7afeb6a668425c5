//! Browser admin console for the gas-delivery platform.

mod api;
mod components;
pub mod hooks;
mod pages;
mod router;
mod session_context;
mod utils;

use yew::prelude::*;

use crate::session_context::SessionProvider;

#[function_component(App)]
fn app() -> Html {
    html! {
        <SessionProvider>
            <router::AppRouter />
        </SessionProvider>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
