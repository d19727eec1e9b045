pub mod client;

pub use client::{ForwardRequest, OrchestratorClient, OrchestratorError};
