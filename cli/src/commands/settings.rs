use anyhow::{anyhow, bail, Context, Result};
use gasdash_shared::{
    permissions::{SETTINGS_READ, SETTINGS_UPDATE},
    AccessPolicy, AdminSettings,
};

use super::{output::print_json, parse_pairs};
use crate::{cli::SettingsCommands, client::AdminClient};

pub async fn run(client: &AdminClient, command: SettingsCommands) -> Result<()> {
    let policy = AccessPolicy::standard();
    let role = client.session().role.as_str();
    match command {
        SettingsCommands::Show => {
            policy.require(role, SETTINGS_READ)?;
            let settings = client
                .fetch_settings()
                .await
                .context("failed to fetch settings")?;
            print_json(&settings)
        },
        SettingsCommands::Set {
            fields,
        } => {
            policy.require(role, SETTINGS_UPDATE)?;
            let mut settings = client
                .fetch_settings()
                .await
                .context("failed to fetch settings")?;
            apply(&mut settings, &fields)?;
            let errors = settings.validate();
            if !errors.is_empty() {
                let details = errors
                    .iter()
                    .map(|(field, message)| format!("  {field}: {message}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                bail!("invalid settings\n{details}");
            }
            let saved = client
                .save_settings(&settings)
                .await
                .context("failed to save settings")?;
            print_json(&saved)
        },
    }
}

pub fn apply(settings: &mut AdminSettings, fields: &[String]) -> Result<()> {
    for (field, value) in parse_pairs(fields)? {
        let value = value.trim();
        match field.as_str() {
            "currency_symbol" => settings.currency_symbol = value.to_string(),
            "default_delivery_fee" => {
                settings.default_delivery_fee = value
                    .parse()
                    .map_err(|_| anyhow!("default_delivery_fee must be a number"))?
            },
            "low_stock_threshold" => {
                settings.low_stock_threshold = value
                    .parse()
                    .map_err(|_| anyhow!("low_stock_threshold must be a whole number"))?
            },
            "page_size" => {
                settings.page_size = value
                    .parse()
                    .map_err(|_| anyhow!("page_size must be a whole number"))?
            },
            other => bail!("unknown setting `{other}`"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_parses_each_setting() {
        let mut settings = AdminSettings::default();
        apply(
            &mut settings,
            &[
                "currency_symbol=$".to_string(),
                "default_delivery_fee=750.5".to_string(),
                "page_size=50".to_string(),
            ],
        )
        .expect("valid settings");
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.default_delivery_fee, 750.5);
        assert_eq!(settings.page_size, 50);
        assert_eq!(settings.low_stock_threshold, 10);

        assert!(apply(&mut settings, &["page_size=many".to_string()]).is_err());
        assert!(apply(&mut settings, &["theme=dark".to_string()]).is_err());
    }
}
