use crate::utils::error::{GroupsError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional settings file. Every key may be omitted.
///
/// ```toml
/// [canvas]
/// url = "https://canvas.ubc.ca/"
/// token_env = "CANVAS_API"
///
/// [groups]
/// csv = "${HOME}/rosters/lab1.csv"
/// name = "Lab 1"
/// prefix = "Lab Group "
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    #[serde(default)]
    pub canvas: CanvasSection,
    #[serde(default)]
    pub groups: GroupsSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanvasSection {
    pub url: Option<String>,
    pub token_env: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupsSection {
    pub csv: Option<String>,
    pub name: Option<String>,
    pub prefix: Option<String>,
}

impl SettingsFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GroupsError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| GroupsError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the value of the environment variable. Unknown
    /// variables are left untouched.
    fn substitute_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_file() {
        let settings = SettingsFile::from_toml_str(
            r#"
[canvas]
url = "https://canvas.example.edu/"
token_env = "MY_CANVAS_TOKEN"

[groups]
csv = "rosters/lab1.csv"
name = "Lab 1"
prefix = "Lab Group "
"#,
        )
        .unwrap();

        assert_eq!(
            settings.canvas.url.as_deref(),
            Some("https://canvas.example.edu/")
        );
        assert_eq!(settings.canvas.token_env.as_deref(), Some("MY_CANVAS_TOKEN"));
        assert_eq!(settings.groups.prefix.as_deref(), Some("Lab Group "));
    }

    #[test]
    fn test_sections_are_optional() {
        let settings = SettingsFile::from_toml_str("[groups]\nname = \"Lab 2\"\n").unwrap();
        assert!(settings.canvas.url.is_none());
        assert_eq!(settings.groups.name.as_deref(), Some("Lab 2"));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = SettingsFile::from_toml_str("[canvas]\ntoken = \"abc\"\n").unwrap_err();
        assert!(matches!(err, GroupsError::ConfigError { .. }));
    }

    #[test]
    fn test_unknown_env_var_is_kept() {
        let settings = SettingsFile::from_toml_str(
            "[groups]\ncsv = \"${CANVAS_GROUPS_SURELY_UNSET_VAR}/lab.csv\"\n",
        )
        .unwrap();
        assert_eq!(
            settings.groups.csv.as_deref(),
            Some("${CANVAS_GROUPS_SURELY_UNSET_VAR}/lab.csv")
        );
    }

    #[test]
    fn test_env_var_is_substituted() {
        let Ok(path) = std::env::var("PATH") else {
            return;
        };
        if path.contains('"') || path.contains('\\') {
            return;
        }
        let settings =
            SettingsFile::from_toml_str("[groups]\nname = \"${PATH}\"\n").unwrap();
        assert_eq!(settings.groups.name.as_deref(), Some(path.as_str()));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[groups]\nprefix = \"Team \"\n").unwrap();

        let settings = SettingsFile::from_file(file.path()).unwrap();
        assert_eq!(settings.groups.prefix.as_deref(), Some("Team "));
    }
}
