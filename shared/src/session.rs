//! Signed-in admin context and console settings.
//!
//! A [`Session`] is built once (from browser storage or CLI flags) and passed
//! to whatever needs the API base, token or role. Nothing else reads storage.

use serde::{Deserialize, Serialize};

use crate::{
    error::FieldErrors,
    permissions::{self, AccessPolicy},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub api_base: String,
    #[serde(default)]
    pub token: Option<String>,
    /// Role name from the login response; drives every permission check.
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub display_name: String,
}

impl Session {
    pub fn anonymous(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: None,
            role: String::new(),
            display_name: String::new(),
        }
    }

    pub fn signed_in(api_base: impl Into<String>, login: LoginResponse) -> Self {
        Self {
            token: Some(login.token),
            role: login.role,
            display_name: login.name,
            ..Self::anonymous(api_base)
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|token| !token.trim().is_empty())
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> Option<String> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| format!("Bearer {token}"))
    }

    /// Absolute URL for an API path such as `/admin/orders`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    pub fn can(&self, permission: &str) -> bool {
        AccessPolicy::standard().allows(&self.role, permission)
    }

    pub fn permissions(&self) -> &'static [&'static str] {
        permissions::permissions_for(&self.role)
    }

    /// Drop credentials, keeping the API base.
    pub fn sign_out(&mut self) {
        self.token = None;
        self.role.clear();
        self.display_name.clear();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: String,
    #[serde(default)]
    pub name: String,
}

/// Values edited on the settings screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminSettings {
    pub currency_symbol: String,
    pub default_delivery_fee: f64,
    pub low_stock_threshold: u32,
    pub page_size: usize,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            currency_symbol: "₦".to_string(),
            default_delivery_fee: 1500.0,
            low_stock_threshold: 10,
            page_size: 20,
        }
    }
}

impl AdminSettings {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let symbol = self.currency_symbol.trim();
        if symbol.is_empty() || symbol.chars().count() > 4 {
            errors.insert(
                "currency_symbol".to_string(),
                "Currency symbol must be 1-4 characters".to_string(),
            );
        }
        if !self.default_delivery_fee.is_finite() || self.default_delivery_fee < 0.0 {
            errors.insert(
                "default_delivery_fee".to_string(),
                "Delivery fee cannot be negative".to_string(),
            );
        }
        if !(5..=200).contains(&self.page_size) {
            errors.insert(
                "page_size".to_string(),
                "Page size must be between 5 and 200".to_string(),
            );
        }
        errors
    }
}
