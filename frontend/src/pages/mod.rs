pub mod dashboard;
pub mod list_page;
pub mod login;
pub mod not_found;
pub mod orders;
pub mod product_form;
pub mod products;
pub mod settings;
pub mod subscription_form;
pub mod subscriptions;
