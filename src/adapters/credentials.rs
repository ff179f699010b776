use crate::domain::ports::{CredentialStore, SecretPrompt};
#[cfg(feature = "cli")]
use crate::utils::error::GroupsError;
use crate::utils::error::Result;
use std::collections::HashMap;

/// Looks secrets up in the environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl CredentialStore for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl CredentialStore for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Hidden-input prompt on the controlling terminal.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

#[cfg(feature = "cli")]
impl SecretPrompt for TerminalPrompt {
    fn read_secret(&self, prompt: &str) -> Result<String> {
        dialoguer::Password::new()
            .with_prompt(prompt)
            .interact()
            .map_err(|e| GroupsError::PromptError {
                message: e.to_string(),
            })
    }
}

/// Answers every prompt with a fixed value without touching the terminal.
#[derive(Debug, Clone)]
pub struct FixedPrompt(pub String);

impl SecretPrompt for FixedPrompt {
    fn read_secret(&self, _prompt: &str) -> Result<String> {
        Ok(self.0.clone())
    }
}
