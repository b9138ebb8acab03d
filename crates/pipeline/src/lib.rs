//! Translation pipeline
//!
//! - [`TranslationOrchestrator`]: lyrics → typed translation result
//! - [`ConversationSession`]: grounded follow-up questions with provider-side
//!   thread continuation
//!
//! Both take the model as an injected `Arc<dyn LanguageModel>` and hold no
//! mutable state, so one instance can serve concurrent requests.

pub mod orchestrator;
pub mod session;
pub mod telemetry;

pub use orchestrator::TranslationOrchestrator;
pub use session::ConversationSession;
