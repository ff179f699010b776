#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::engine::GroupsOptions;
use crate::core::provisioner::ProvisionOptions;
use crate::core::session::{SessionSettings, TokenSource, DEFAULT_TOKEN_ENV};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_url, Validate,
};
use toml_config::SettingsFile;

pub const DEFAULT_CSV_PATH: &str = "data/students2020.csv";
pub const DEFAULT_GROUP_SET_NAME: &str = "New Group Set";
pub const DEFAULT_GROUP_PREFIX: &str = "Group ";
pub const DEFAULT_API_URL: &str = "https://canvas.ubc.ca/";

/// Values given explicitly on the command line. `None` falls back to the
/// settings file, then to the built-in default.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub csv: Option<String>,
    pub name: Option<String>,
    pub prefix: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub course_id: u64,
    pub csv_path: String,
    pub group_set_name: String,
    pub group_prefix: String,
    pub api_url: String,
    pub token_env: String,
    pub token: TokenSource,
    pub show_progress: bool,
}

impl ResolvedSettings {
    pub fn resolve(
        course_id: u64,
        overrides: &SettingsOverrides,
        file: Option<&SettingsFile>,
        token: TokenSource,
    ) -> Self {
        let file = file.cloned().unwrap_or_default();
        let pick = |cli: &Option<String>, from_file: Option<String>, default: &str| {
            cli.clone()
                .or(from_file)
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            course_id,
            csv_path: pick(&overrides.csv, file.groups.csv, DEFAULT_CSV_PATH),
            group_set_name: pick(&overrides.name, file.groups.name, DEFAULT_GROUP_SET_NAME),
            group_prefix: pick(&overrides.prefix, file.groups.prefix, DEFAULT_GROUP_PREFIX),
            api_url: pick(&overrides.url, file.canvas.url, DEFAULT_API_URL),
            token_env: file
                .canvas
                .token_env
                .unwrap_or_else(|| DEFAULT_TOKEN_ENV.to_string()),
            token,
            show_progress: true,
        }
    }

    pub fn into_options(self) -> GroupsOptions {
        GroupsOptions {
            csv_path: self.csv_path.into(),
            session: SessionSettings {
                api_url: self.api_url,
                course_id: self.course_id,
                token_env: self.token_env,
            },
            token: self.token,
            provision: ProvisionOptions {
                group_set_name: self.group_set_name,
                group_prefix: self.group_prefix,
                show_progress: self.show_progress,
            },
        }
    }
}

impl Validate for ResolvedSettings {
    fn validate(&self) -> Result<()> {
        validate_positive_number("course", self.course_id, 1)?;
        validate_path("csv", &self.csv_path)?;
        validate_non_empty_string("name", &self.group_set_name)?;
        validate_url("url", &self.api_url)?;
        validate_non_empty_string("token_env", &self.token_env)?;
        Ok(())
    }
}
