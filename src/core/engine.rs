use crate::core::provisioner::{provision_groups, ProvisionOptions};
use crate::core::roster::load_roster;
use crate::core::session::{authenticate, SessionSettings, TokenSource};
use crate::domain::model::ProvisionReport;
use crate::domain::ports::{CredentialStore, SecretPrompt};
use crate::utils::error::Result;
use std::path::PathBuf;

/// Everything one run needs, already resolved from flags, file and defaults.
#[derive(Debug, Clone)]
pub struct GroupsOptions {
    pub csv_path: PathBuf,
    pub session: SessionSettings,
    pub token: TokenSource,
    pub provision: ProvisionOptions,
}

/// Loads the roster, opens the course and creates the groups.
///
/// The roster is read before any credential is requested, so a bad file
/// fails without prompting or touching the network.
pub async fn create_groups<C, P>(
    options: &GroupsOptions,
    credentials: &C,
    prompt: &P,
) -> Result<ProvisionReport>
where
    C: CredentialStore + ?Sized,
    P: SecretPrompt + ?Sized,
{
    let roster = load_roster(&options.csv_path)?;
    let session = authenticate(&options.session, &options.token, credentials, prompt).await?;
    provision_groups(&roster, &session, &options.provision).await
}
