use super::toml_config::SettingsFile;
use super::{ResolvedSettings, SettingsOverrides};
use crate::core::session::TokenSource;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "canvas-groups")]
#[command(about = "Create Canvas groups from a CSV of student numbers and group numbers")]
pub struct CliConfig {
    #[arg(long, help = "Canvas course id (the number in the course URL)")]
    pub course: u64,

    #[arg(
        long,
        help = "Roster CSV with 'student_number' and 'group_num' columns [default: data/students2020.csv]"
    )]
    pub csv: Option<String>,

    #[arg(long, help = "Name of the new group set [default: New Group Set]")]
    pub name: Option<String>,

    #[arg(long, help = "Prefix for each group name [default: \"Group \"]")]
    pub prefix: Option<String>,

    #[arg(long, help = "Base URL of the Canvas instance [default: https://canvas.ubc.ca/]")]
    pub url: Option<String>,

    #[arg(
        long,
        help = "Enter the Canvas token interactively instead of reading CANVAS_API"
    )]
    pub token: bool,

    #[arg(long, help = "TOML settings file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Hide the progress bar")]
    pub quiet: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn token_source(&self) -> TokenSource {
        if self.token {
            TokenSource::Interactive
        } else {
            TokenSource::Implicit
        }
    }

    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            csv: self.csv.clone(),
            name: self.name.clone(),
            prefix: self.prefix.clone(),
            url: self.url.clone(),
        }
    }

    /// Merges flags with the settings file (if any) and built-in defaults.
    pub fn resolve(&self) -> Result<ResolvedSettings> {
        let file = match &self.config {
            Some(path) => {
                tracing::debug!("Reading settings from {}", path.display());
                Some(SettingsFile::from_file(path)?)
            }
            None => None,
        };

        let mut settings = ResolvedSettings::resolve(
            self.course,
            &self.overrides(),
            file.as_ref(),
            self.token_source(),
        );
        settings.show_progress = !self.quiet;
        Ok(settings)
    }
}
