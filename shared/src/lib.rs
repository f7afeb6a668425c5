//! Domain logic of the gas-delivery admin console.
//!
//! Everything here is target-agnostic: the Yew frontend and the `gasdash`
//! CLI both link this crate and supply their own HTTP backends through
//! [`bulk::BulkBackend`] and [`forms::FormBackend`].

pub mod analytics;
pub mod bulk;
pub mod csv_export;
pub mod error;
pub mod format;
pub mod forms;
pub mod list_query;
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;
pub mod models;
pub mod permissions;
pub mod routes;
pub mod selection;
pub mod session;

pub use analytics::DashboardStats;
pub use bulk::{
    dispatch, dispatch_one, execute, BulkAction, BulkBackend, BulkEntity, BulkOutcome, EntityKind,
};
pub use error::{ActionResult, ApiError, FieldErrors};
pub use forms::{EntityDraft, FormBackend, FormState, ProductDraft, SubscriptionDraft};
pub use list_query::{FilterCriteria, Listable, SortDirection, SortSpec};
pub use models::*;
pub use permissions::AccessPolicy;
pub use selection::{AdminList, Selection};
pub use session::{AdminSettings, LoginRequest, LoginResponse, Session};
