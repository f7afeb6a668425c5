// Reusable components live here.

pub mod bulk_toolbar;
pub mod error_banner;
pub mod form_field;
pub mod header;
pub mod list_controls;
pub mod loading_spinner;
pub mod pagination;
pub mod stats_card;
pub mod status_badge;
