pub mod app;
pub mod bootstrap;
pub mod config;
pub mod logger;
pub mod server;
pub mod settings_page;
pub mod templates;

pub use bootstrap::init_foundation;
