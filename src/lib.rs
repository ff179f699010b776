pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;
pub use crate::config::{ResolvedSettings, SettingsOverrides};

pub use crate::adapters::{CanvasClient, ProcessEnv};
pub use crate::core::engine::{create_groups, GroupsOptions};
pub use crate::core::provisioner::{provision_groups, ProvisionOptions};
pub use crate::core::roster::{load_roster, Roster};
pub use crate::core::session::{authenticate, TokenSource};
pub use crate::domain::model::ProvisionReport;
pub use crate::utils::error::{GroupsError, Result};
