//! idcheck library
//!
//! Reference host for the identifier checker: tree files, findings and
//! configuration. Exposed for integration testing.

pub mod config;
pub mod errors;
pub mod host;
pub mod report;

pub use config::{AppConfig, LogFormat};
pub use errors::{IdcheckError, Result};
pub use host::{load_tree, ClassHierarchy, HostView, NodeSpec, TreeDocument, TreeSource};
pub use report::{render, Finding, FindingLog, OutputFormat};
