pub mod app;
pub mod board;
pub mod catalog;
pub mod challenge;
pub mod config;
pub mod content;
pub mod errors;
pub mod greeting;
pub mod handlers;
pub mod models;
pub mod motivation;
pub mod quest;
pub mod reconcile;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod view;

pub use app::router;
pub use config::Config;
pub use quest::QuestService;
pub use state::AppState;
pub use storage::{JsonFileStore, MemoryStore, Persistence};
