pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod live;
pub mod models;
pub mod notify;
pub mod selection;
pub mod state;
pub mod stats;
pub mod storage;
pub mod store;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use live::LiveView;
pub use state::AppState;
pub use store::{JsonFileStore, OrderStore};
