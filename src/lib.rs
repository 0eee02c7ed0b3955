// modlist - mod identity resolution and report data for modded Minecraft instances
//
// This is the library crate containing the resolution pipeline, the collectors and the data
// structures. The binary crate (main.rs) wires settings, logging and the runtime around it.

pub mod config;
pub mod knowledge;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod report;
pub mod services;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use knowledge::KnowledgeBase;
pub use metrics::ResolutionMetrics;
pub use models::{AddonCandidate, AddonRecord, InstanceLayout, Provenance, Settings};
pub use report::{Report, ReportBuilder, write_report};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
