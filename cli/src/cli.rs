use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Vertical,
    Json,
}

#[derive(Parser)]
#[command(name = "gasdash", version, about = "GasDash admin console CLI")]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// How to reach the admin API and who is calling it.
#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// Admin API base URL.
    #[arg(
        long,
        env = "GASDASH_API_BASE",
        default_value = "http://localhost:4000/api",
        global = true
    )]
    pub api_base: String,
    /// Bearer token from `gasdash login`.
    #[arg(long, env = "GASDASH_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,
    /// Role the token was issued for; permission checks run locally first.
    #[arg(long, env = "GASDASH_ROLE", default_value = "viewer", global = true)]
    pub role: String,
    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout_secs: u64,
    /// Also write logs to a daily-rolling file in this directory.
    #[arg(long, env = "GASDASH_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and print the export lines for the token and role.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "GASDASH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Order management.
    Orders {
        #[command(subcommand)]
        command: EntityCommands,
    },
    /// Subscription management.
    Subscriptions {
        #[command(subcommand)]
        command: SubscriptionCommands,
    },
    /// Product catalog management.
    Products {
        #[command(subcommand)]
        command: ProductCommands,
    },
    /// Dashboard numbers computed from the current orders, subscriptions and
    /// products.
    Stats {
        /// Override the low-stock threshold from the console settings.
        #[arg(long)]
        low_stock_threshold: Option<u32>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Vertical, ignore_case = true)]
        format: OutputFormat,
    },
    /// Console settings.
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

/// Filter and sort flags shared by list, export and bulk commands.
#[derive(Debug, Clone, Default, Args)]
pub struct ListFilters {
    /// `field=value` constraint; `all` or empty means no constraint.
    /// Repeatable, e.g. `--filter status=in-transit`.
    #[arg(long = "filter", value_name = "FIELD=VALUE")]
    pub filters: Vec<String>,
    /// Case-insensitive text matched against names, emails and ids.
    #[arg(long)]
    pub search: Option<String>,
    /// First day of the date range (`YYYY-MM-DD`, inclusive).
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last day of the date range (`YYYY-MM-DD`, inclusive).
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// `field` or `field:asc|desc`.
    #[arg(long)]
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub filters: ListFilters,
    /// Show at most this many rows.
    #[arg(long)]
    pub limit: Option<usize>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, ignore_case = true)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filters: ListFilters,
    /// Output file, or a directory to place the dated default name in.
    /// Prints to stdout when omitted.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Which rows a bulk command applies to.
#[derive(Debug, Clone, Args)]
pub struct Targets {
    /// Ids to act on. Must be visible under the given filters.
    #[arg(long = "id", value_name = "ID", required_unless_present = "all_matching")]
    pub ids: Vec<String>,
    /// Act on every row matching the filters.
    #[arg(long, conflicts_with = "ids")]
    pub all_matching: bool,
    #[command(flatten)]
    pub filters: ListFilters,
}

#[derive(Subcommand)]
pub enum EntityCommands {
    List(ListArgs),
    /// Write the filtered rows as CSV.
    Export(ExportArgs),
    /// Move rows to a new status.
    SetStatus {
        status: String,
        #[command(flatten)]
        targets: Targets,
    },
    Delete {
        #[command(flatten)]
        targets: Targets,
    },
}

#[derive(Subcommand)]
pub enum SubscriptionCommands {
    #[command(flatten)]
    Common(EntityCommands),
    Pause {
        #[command(flatten)]
        targets: Targets,
    },
    Resume {
        #[command(flatten)]
        targets: Targets,
    },
    Cancel {
        #[command(flatten)]
        targets: Targets,
    },
    /// Create a subscription from `--set field=value` pairs.
    Create {
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        fields: Vec<String>,
    },
    /// Edit a subscription; unspecified fields keep their current value.
    Update {
        id: String,
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        fields: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum ProductCommands {
    #[command(flatten)]
    Common(EntityCommands),
    /// Create a product from `--set field=value` pairs.
    Create {
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        fields: Vec<String>,
    },
    /// Edit a product; unspecified fields keep their current value.
    Update {
        id: String,
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        fields: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    Show,
    /// Change settings from `--set field=value` pairs.
    Set {
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        fields: Vec<String>,
    },
}
