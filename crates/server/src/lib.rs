//! Lyric Tutor Server
//!
//! Thin HTTP transport over the translation pipeline.

pub mod http;
pub mod metrics;
pub mod state;

pub use http::create_router;
pub use metrics::init_metrics;
pub use state::AppState;

use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Model backend error: {0}")]
    Model(#[from] lyric_tutor_llm::LlmError),

    #[error("Metrics error: {0}")]
    Metrics(String),
}
