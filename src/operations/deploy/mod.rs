//! Deploy operation submodules

pub mod activation;
pub mod orchestrator;
pub mod stage;

pub use activation::{ActivationDecision, AutoActivate, DeclineActivation, PromptActivation};
pub use orchestrator::{DeployOperation, DeployOptions, DeployReport};
pub use stage::Stage;
