use gasdash_shared::{
    format::{format_currency, format_percent, humanize},
    permissions, DashboardStats, Order, Product, Subscription,
};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::{
    api::{BrowserBackend, RemoteRows},
    components::{
        error_banner::ErrorBanner,
        loading_spinner::{LoadingSpinner, SpinnerSize},
        stats_card::StatsCard,
        status_badge::StatusBadge,
    },
    hooks::use_settings,
    router::Route,
    session_context::use_session,
    utils::report_error,
};

#[derive(Clone, PartialEq, Default)]
struct Snapshot {
    orders: Vec<Order>,
    subscriptions: Vec<Subscription>,
    products: Vec<Product>,
}

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let (session, session_ctx) = use_session();
    let settings = use_settings();
    let snapshot = use_state(Snapshot::default);
    let loading = use_state(|| true);
    let error = use_state(|| None::<String>);

    {
        let snapshot = snapshot.clone();
        let loading = loading.clone();
        let error = error.clone();
        use_effect_with(session.clone(), move |session| {
            let backend = BrowserBackend::new(session.clone());
            let can_orders = session.can(permissions::ORDERS_READ);
            let can_subscriptions = session.can(permissions::SUBSCRIPTIONS_READ);
            let can_products = session.can(permissions::PRODUCTS_READ);
            loading.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                let mut next = Snapshot::default();
                let outcome = async {
                    if can_orders {
                        next.orders = Order::fetch_all(&backend).await?;
                    }
                    if can_subscriptions {
                        next.subscriptions = Subscription::fetch_all(&backend).await?;
                    }
                    if can_products {
                        next.products = Product::fetch_all(&backend).await?;
                    }
                    Ok::<(), gasdash_shared::ApiError>(())
                }
                .await;
                match outcome {
                    Ok(()) => error.set(None),
                    Err(err) => error.set(Some(report_error(
                        "failed to load dashboard",
                        &err,
                        session_ctx.as_ref(),
                    ))),
                }
                snapshot.set(next);
                loading.set(false);
            });
            || ()
        });
    }

    let stats = use_memo(
        (snapshot.clone(), settings.low_stock_threshold),
        |(snapshot, threshold)| {
            DashboardStats::compute(
                &snapshot.orders,
                &snapshot.subscriptions,
                &snapshot.products,
                *threshold,
            )
        },
    );

    if *loading {
        return html! { <LoadingSpinner size={SpinnerSize::Large} label="Loading dashboard..." /> };
    }

    let symbol = settings.currency_symbol.clone();
    let money = |amount: f64| format_currency(amount, &symbol);

    let by_status = stats
        .orders_by_status
        .iter()
        .map(|(status, count)| {
            html! {
                <li key={status.clone()} class={classes!("flex", "items-center", "justify-between", "py-1")}>
                    <StatusBadge status={status.clone()} />
                    <span class={classes!("font-semibold")}>{ *count }</span>
                </li>
            }
        })
        .collect::<Html>();

    let low_stock = if stats.low_stock.is_empty() {
        html! { <p class={classes!("text-sm", "text-[var(--muted)]")}>{ "All active products are above the threshold." }</p> }
    } else {
        html! {
            <ul class={classes!("divide-y", "divide-[var(--border)]")}>
                { for stats.low_stock.iter().map(|item| html! {
                    <li key={item.id.clone()} class={classes!("flex", "justify-between", "py-1")}>
                        <Link<Route> to={Route::ProductEdit { id: item.id.clone() }}>{ item.name.clone() }</Link<Route>>
                        <span class={classes!("font-semibold", "text-amber-700")}>{ format!("{} left", item.stock) }</span>
                    </li>
                }) }
            </ul>
        }
    };

    html! {
        <section class={classes!("space-y-6")}>
            <h1 class={classes!("text-2xl", "font-semibold")}>
                { format!("Welcome back{}", if session.display_name.is_empty() { String::new() } else { format!(", {}", session.display_name) }) }
            </h1>
            if let Some(message) = (*error).clone() {
                <ErrorBanner message={message} auto_dismiss={false} />
            }
            <div class={classes!("grid", "gap-4", "sm:grid-cols-2", "lg:grid-cols-4")}>
                <StatsCard label="Orders" value={stats.total_orders.to_string()} route={Some(Route::Orders)} />
                <StatsCard
                    label="Revenue"
                    value={money(stats.revenue)}
                    hint={Some(format!("Average order {}", money(stats.average_order_value)))}
                />
                <StatsCard
                    label="Pending payments"
                    value={stats.pending_payments.to_string()}
                    hint={Some(format!("{} failed", stats.failed_payments))}
                />
                <StatsCard label="Delivery rate" value={format_percent(stats.delivery_rate())} />
                <StatsCard
                    label="Active subscriptions"
                    value={stats.active_subscriptions.to_string()}
                    hint={Some(format!("{} paused", stats.paused_subscriptions))}
                    route={Some(Route::Subscriptions)}
                />
                <StatsCard label="Monthly recurring revenue" value={money(stats.monthly_recurring_revenue)} />
                <StatsCard
                    label="Active products"
                    value={stats.active_products.to_string()}
                    hint={Some(format!("{} low on stock", stats.low_stock.len()))}
                    route={Some(Route::Products)}
                />
            </div>
            <div class={classes!("grid", "gap-6", "md:grid-cols-2")}>
                <div class={classes!("rounded-2xl", "border", "border-[var(--border)]", "p-4")}>
                    <h2 class={classes!("mb-2", "font-semibold")}>{ "Orders by status" }</h2>
                    <ul>{ by_status }</ul>
                </div>
                <div class={classes!("rounded-2xl", "border", "border-[var(--border)]", "p-4")}>
                    <h2 class={classes!("mb-2", "font-semibold")}>
                        { format!("Low stock (≤ {})", settings.low_stock_threshold) }
                    </h2>
                    { low_stock }
                </div>
            </div>
            <p class={classes!("text-xs", "text-[var(--muted)]")}>
                { format!("Signed in as {}", humanize(&session.role)) }
            </p>
        </section>
    }
}
