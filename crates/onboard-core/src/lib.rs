pub mod config;
pub mod credential;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod github;
pub mod mannequin;
pub mod pipeline;
pub mod resolve;
pub mod trigger;

pub use credential::Credential;
pub use error::{OnboardError, Result};
