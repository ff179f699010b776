pub mod engine;
pub mod provisioner;
pub mod roster;
pub mod session;

pub use crate::domain::model::{ProvisionReport, RosterRow};
pub use crate::domain::ports::{CanvasApi, CredentialStore, SecretPrompt};
pub use crate::utils::error::Result;
