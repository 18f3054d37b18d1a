pub mod config;
pub mod display;
pub mod preview;
pub mod reconcile;
pub mod store;
pub mod twitter_client;
