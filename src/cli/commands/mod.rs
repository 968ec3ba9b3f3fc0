//! CLI command implementations.

mod ask;
mod config;
mod import;
mod list;
mod nearby;
mod serve;

pub use ask::run_ask;
pub use config::run_config;
pub use import::run_import;
pub use list::run_list;
pub use nearby::run_nearby;
pub use serve::{router, run_serve};
