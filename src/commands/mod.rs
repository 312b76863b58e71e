mod history;
mod list;
mod price;
mod watch;

pub use history::run_history;
pub use list::{default_symbols, run_list, ListReport, ListScope};
pub use price::run_price;
pub use watch::{run_watch, validate_interval, DEFAULT_INTERVAL_SECS};
