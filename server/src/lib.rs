//! Storybook outline server
//!
//! Hosts `POST /api/outline`, which turns a story theme into a children's
//! story outline through an OpenAI-compatible completion provider.

pub mod api;
pub mod config;
pub mod outline;
pub mod provider;
pub mod state;

pub use config::Config;
pub use state::AppState;
