pub mod config;
pub mod error;
pub mod db;
pub mod graph;
pub mod gexf;
pub mod export;

pub use config::{Config, NodeStrategy};
pub use error::{Phase, RoadGexfError, Result};
pub use export::{run, ExportSummary};
