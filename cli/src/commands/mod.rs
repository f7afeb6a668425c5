pub mod entities;
pub mod forms;
pub mod login;
pub mod output;
pub mod settings;
pub mod stats;

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use gasdash_shared::{
    list_query::{FilterCriteria, SortSpec},
    ActionResult, BulkAction, EntityKind, Order, Product, Session, Subscription,
    SubscriptionStatus,
};

use crate::{
    cli::{
        Cli, Commands, ConnectionArgs, EntityCommands, ListFilters, ProductCommands,
        SubscriptionCommands,
    },
    client::AdminClient,
};

pub async fn run(cli: Cli) -> Result<()> {
    let client = connect(&cli.connection)?;
    match cli.command {
        Commands::Login {
            email,
            password,
        } => login::run(&client, &email, &password).await,
        Commands::Orders {
            command,
        } => run_entity::<Order>(&client, command).await,
        Commands::Subscriptions {
            command,
        } => match command {
            SubscriptionCommands::Common(command) => {
                run_entity::<Subscription>(&client, command).await
            },
            SubscriptionCommands::Pause {
                targets,
            } => {
                let action = BulkAction::SetStatus(SubscriptionStatus::Paused.to_string());
                entities::bulk::<Subscription>(&client, &targets, &action).await
            },
            SubscriptionCommands::Resume {
                targets,
            } => {
                let action = BulkAction::SetStatus(SubscriptionStatus::Active.to_string());
                entities::bulk::<Subscription>(&client, &targets, &action).await
            },
            SubscriptionCommands::Cancel {
                targets,
            } => {
                let action = BulkAction::SetStatus(SubscriptionStatus::Cancelled.to_string());
                entities::bulk::<Subscription>(&client, &targets, &action).await
            },
            SubscriptionCommands::Create {
                fields,
            } => forms::create_subscription(&client, &fields).await,
            SubscriptionCommands::Update {
                id,
                fields,
            } => forms::update_subscription(&client, &id, &fields).await,
        },
        Commands::Products {
            command,
        } => match command {
            ProductCommands::Common(command) => run_entity::<Product>(&client, command).await,
            ProductCommands::Create {
                fields,
            } => forms::create_product(&client, &fields).await,
            ProductCommands::Update {
                id,
                fields,
            } => forms::update_product(&client, &id, &fields).await,
        },
        Commands::Stats {
            low_stock_threshold,
            format,
        } => stats::run(&client, low_stock_threshold, format).await,
        Commands::Settings {
            command,
        } => settings::run(&client, command).await,
    }
}

async fn run_entity<T: entities::RemoteEntity>(
    client: &AdminClient,
    command: EntityCommands,
) -> Result<()> {
    match command {
        EntityCommands::List(args) => entities::list::<T>(client, &args).await,
        EntityCommands::Export(args) => entities::export::<T>(client, &args).await,
        EntityCommands::SetStatus {
            status,
            targets,
        } => entities::bulk::<T>(client, &targets, &BulkAction::SetStatus(status)).await,
        EntityCommands::Delete {
            targets,
        } => entities::bulk::<T>(client, &targets, &BulkAction::Delete).await,
    }
}

pub fn connect(args: &ConnectionArgs) -> Result<AdminClient> {
    let session = Session {
        token: args.token.clone(),
        role: args.role.trim().to_string(),
        ..Session::anonymous(args.api_base.trim())
    };
    tracing::debug!(api_base = %session.api_base, role = %session.role, "admin session");
    AdminClient::new(session, Duration::from_secs(args.timeout_secs.max(1)))
}

/// Split `field=value` pairs from the command line.
pub fn parse_pairs(pairs: &[String]) -> Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|pair| {
            let (field, value) = pair
                .split_once('=')
                .ok_or_else(|| anyhow!("expected FIELD=VALUE, got `{pair}`"))?;
            let field = field.trim();
            if field.is_empty() {
                bail!("empty field name in `{pair}`");
            }
            Ok((field.to_string(), value.to_string()))
        })
        .collect()
}

/// Criteria and sort for the list filter flags.
pub fn criteria_from(filters: &ListFilters) -> Result<(FilterCriteria, Option<SortSpec>)> {
    let mut criteria = FilterCriteria::new().with_date_range(filters.from, filters.to);
    for (field, value) in parse_pairs(&filters.filters)? {
        criteria.set_field(field, value);
    }
    if let Some(search) = &filters.search {
        criteria = criteria.with_search(search.as_str());
    }
    let sort = filters
        .sort
        .as_deref()
        .map(|raw| {
            raw.parse::<SortSpec>()
                .map_err(|err| anyhow!("invalid --sort `{raw}`: {err}"))
        })
        .transpose()?;
    Ok((criteria, sort))
}

/// Print the outcome and turn a failed action into a non-zero exit.
pub fn report(result: ActionResult) -> Result<()> {
    if result.success {
        println!("{}", result.message);
        Ok(())
    } else {
        Err(anyhow!(result.message)).context("action failed")
    }
}

fn permission(kind: EntityKind, action: &str) -> &'static str {
    use gasdash_shared::permissions::*;
    match (kind, action) {
        (EntityKind::Orders, "export") => ORDERS_EXPORT,
        (EntityKind::Subscriptions, "export") => SUBSCRIPTIONS_EXPORT,
        (EntityKind::Orders, _) => ORDERS_READ,
        (EntityKind::Subscriptions, _) => SUBSCRIPTIONS_READ,
        // Products carry no separate export permission.
        (EntityKind::Products, _) => PRODUCTS_READ,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_split_on_first_equals() {
        let pairs = parse_pairs(&["name=a=b".to_string(), " price =10".to_string()])
            .expect("valid pairs");
        assert_eq!(
            pairs,
            vec![
                ("name".to_string(), "a=b".to_string()),
                ("price".to_string(), "10".to_string())
            ]
        );
        assert!(parse_pairs(&["novalue".to_string()]).is_err());
        assert!(parse_pairs(&["=x".to_string()]).is_err());
    }

    #[test]
    fn filters_become_criteria() {
        let filters = ListFilters {
            filters: vec!["status=in-transit".to_string(), "payment_status=all".to_string()],
            search: Some("ada".to_string()),
            sort: Some("amount:desc".to_string()),
            ..Default::default()
        };
        let (criteria, sort) = criteria_from(&filters).expect("valid");
        assert_eq!(criteria.active_value("status"), Some("in-transit"));
        assert_eq!(criteria.active_value("payment_status"), None);
        assert_eq!(sort, Some(SortSpec::desc("amount")));

        let bad = ListFilters {
            sort: Some("amount:sideways".to_string()),
            ..Default::default()
        };
        assert!(criteria_from(&bad).is_err());
    }
}
