mod app;
mod args;
mod commands;
mod config;
pub mod error;
pub mod http;
pub mod providers;
pub mod schedule;
pub mod service;
mod ui;
mod utils;

pub use app::Application;
pub use args::Cli;
pub use commands::{
    default_symbols, run_history, run_list, run_price, run_watch, validate_interval, ListReport,
    ListScope,
};
pub use config::AppConfig;
pub use error::{PriceError, PriceResult};
pub use providers::{AssetType, PricePoint, PriceProvider};
pub use service::PriceService;
pub use utils::logging::init_logging;
