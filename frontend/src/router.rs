use gasdash_shared::permissions;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::{components::header::Header, pages, session_context::use_session};

#[derive(Routable, Clone, PartialEq, Debug)]
pub enum Route {
    #[at("/")]
    Dashboard,
    #[at("/orders")]
    Orders,
    #[at("/subscriptions")]
    Subscriptions,
    #[at("/subscriptions/new")]
    SubscriptionNew,
    #[at("/subscriptions/:id/edit")]
    SubscriptionEdit { id: String },
    #[at("/products")]
    Products,
    #[at("/products/new")]
    ProductNew,
    #[at("/products/:id/edit")]
    ProductEdit { id: String },
    #[at("/settings")]
    Settings,
    #[at("/login")]
    Login,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl Route {
    /// Permission needed to open the page; `None` for public pages.
    pub fn permission(&self) -> Option<&'static str> {
        match self {
            Route::Dashboard => Some(permissions::DASHBOARD_VIEW),
            Route::Orders => Some(permissions::ORDERS_READ),
            Route::Subscriptions => Some(permissions::SUBSCRIPTIONS_READ),
            Route::SubscriptionNew
            | Route::SubscriptionEdit {
                ..
            } => Some(permissions::SUBSCRIPTIONS_UPDATE),
            Route::Products => Some(permissions::PRODUCTS_READ),
            Route::ProductNew => Some(permissions::PRODUCTS_CREATE),
            Route::ProductEdit {
                ..
            } => Some(permissions::PRODUCTS_UPDATE),
            Route::Settings => Some(permissions::SETTINGS_READ),
            Route::Login | Route::NotFound => None,
        }
    }
}

fn switch(route: Route) -> Html {
    match route {
        Route::Dashboard => html! { <pages::dashboard::DashboardPage /> },
        Route::Orders => html! { <pages::orders::OrdersPage /> },
        Route::Subscriptions => html! { <pages::subscriptions::SubscriptionsPage /> },
        Route::SubscriptionNew => html! { <pages::subscription_form::SubscriptionFormPage /> },
        Route::SubscriptionEdit {
            id,
        } => html! { <pages::subscription_form::SubscriptionFormPage id={Some(id)} /> },
        Route::Products => html! { <pages::products::ProductsPage /> },
        Route::ProductNew => html! { <pages::product_form::ProductFormPage /> },
        Route::ProductEdit {
            id,
        } => html! { <pages::product_form::ProductFormPage id={Some(id)} /> },
        Route::Settings => html! { <pages::settings::SettingsPage /> },
        Route::Login => html! { <pages::login::LoginPage /> },
        Route::NotFound => html! { <pages::not_found::NotFoundPage /> },
    }
}

#[derive(Properties, PartialEq)]
struct GuardProps {
    route: Route,
}

/// Sends anonymous visitors to the login page and hides pages the role
/// cannot open.
#[function_component(Guard)]
fn guard(props: &GuardProps) -> Html {
    let (session, _) = use_session();
    let Some(permission) = props.route.permission() else {
        return switch(props.route.clone());
    };
    if !session.is_authenticated() {
        return html! { <Redirect<Route> to={Route::Login} /> };
    }
    if !session.can(permission) {
        return html! { <pages::not_found::NotFoundPage forbidden=true /> };
    }
    switch(props.route.clone())
}

#[function_component(AppRouter)]
pub fn app_router() -> Html {
    html! {
        <BrowserRouter>
            <div class={classes!("flex", "min-h-screen", "flex-col", "bg-[var(--bg)]")}>
                <Header />
                <main class={classes!("flex-1", "px-4", "py-6", "md:px-8")}>
                    <Switch<Route> render={|route| html! { <Guard route={route} /> }} />
                </main>
            </div>
        </BrowserRouter>
    }
}
