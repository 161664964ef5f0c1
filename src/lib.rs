// Carbon Garden - Core Library
// Tree catalog, garden bookkeeping and reports, shared by the CLI and the TUI

pub mod error;
pub mod entities;
pub mod catalog;
pub mod garden;
pub mod session;
pub mod report;
pub mod config;

// Re-export commonly used types
pub use error::{CatalogError, SessionError};
pub use entities::Tree;
pub use catalog::{
    Catalog, CatalogSource, Registration,
    parse_rate, DEFAULT_TREES,
};
pub use garden::{Garden, GardenStats, Planting, Removal};
pub use session::Session;
pub use report::ChartBar;
pub use config::{Args, Command, Config};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
