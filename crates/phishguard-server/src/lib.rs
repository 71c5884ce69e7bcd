//! PhishGuard front ends
//!
//! Thin transports around [`phishguard_policy::HybridDecision`]: a
//! command-line analyzer and an HTTP JSON service. Each front end receives
//! text, calls the decision, and renders the verdict for its medium.

pub mod cli;
pub mod config;
pub mod render;
pub mod routes;
pub mod state;

pub use config::{AppConfig, Overrides};
pub use routes::create_router;
pub use state::{build_decision, AppState};
