use anyhow::{Context, Result};
use gasdash_shared::{
    format::{format_currency, format_percent},
    permissions::DASHBOARD_VIEW,
    AccessPolicy, DashboardStats,
};

use super::output::print_json;
use crate::{cli::OutputFormat, client::AdminClient};

pub async fn run(
    client: &AdminClient,
    low_stock_threshold: Option<u32>,
    format: OutputFormat,
) -> Result<()> {
    AccessPolicy::standard().require(&client.session().role, DASHBOARD_VIEW)?;

    let orders = client.list_orders().await.context("failed to fetch orders")?;
    let subscriptions = client
        .list_subscriptions()
        .await
        .context("failed to fetch subscriptions")?;
    let products = client
        .list_products()
        .await
        .context("failed to fetch products")?;
    let settings = match client.fetch_settings().await {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(error = %err, "settings unavailable, using defaults");
            Default::default()
        },
    };

    let threshold = low_stock_threshold.unwrap_or(settings.low_stock_threshold);
    let stats = DashboardStats::compute(&orders, &subscriptions, &products, threshold);
    match format {
        OutputFormat::Json => print_json(&stats),
        OutputFormat::Table | OutputFormat::Vertical => {
            print!("{}", render(&stats, &settings.currency_symbol));
            Ok(())
        },
    }
}

pub fn render(stats: &DashboardStats, symbol: &str) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: String| out.push_str(&format!("{label:>22}: {value}\n"));
    line("orders", stats.total_orders.to_string());
    line("revenue", format_currency(stats.revenue, symbol));
    line("average order", format_currency(stats.average_order_value, symbol));
    line("pending payments", stats.pending_payments.to_string());
    line("failed payments", stats.failed_payments.to_string());
    line("delivery rate", format_percent(stats.delivery_rate()));
    line("active subscriptions", stats.active_subscriptions.to_string());
    line("paused subscriptions", stats.paused_subscriptions.to_string());
    line("monthly recurring", format_currency(stats.monthly_recurring_revenue, symbol));
    line("active products", stats.active_products.to_string());
    for (status, count) in &stats.orders_by_status {
        line(&format!("orders {status}"), count.to_string());
    }
    if stats.low_stock.is_empty() {
        line("low stock", "none".to_string());
    } else {
        for item in &stats.low_stock {
            line("low stock", format!("{} ({} left)", item.name, item.stock));
        }
    }
    out
}
