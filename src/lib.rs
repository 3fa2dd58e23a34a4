pub mod app;
pub mod config;
pub mod curve;
pub mod editor;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod recurrence;
pub mod state;
pub mod storage;
pub mod store;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::load_store;
