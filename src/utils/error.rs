use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroupsError {
    #[error("Failed to read roster {path}: {source}")]
    RosterError {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("HTTP request failed while trying to {operation}: {source}")]
    HttpError {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Canvas rejected the access token while trying to {operation}")]
    InvalidAccessToken { operation: String },

    #[error("Canvas resource not found while trying to {operation}")]
    ResourceNotFound { operation: String },

    #[error("Canvas returned {status} while trying to {operation}: {body}")]
    RemoteError {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("Unexpected response from Canvas while trying to {operation}: {source}")]
    SerializationError {
        operation: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("No Canvas token found in environment variable '{var}'")]
    MissingToken { var: String },

    #[error("Could not read token from terminal: {message}")]
    PromptError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl GroupsError {
    pub fn recovery_suggestion(&self) -> String {
        match self {
            GroupsError::RosterError { .. } => {
                "Check that the CSV file exists and has 'student_number' and 'group_num' columns"
                    .to_string()
            }
            GroupsError::HttpError { .. } => {
                "Check the Canvas URL and your network connection".to_string()
            }
            GroupsError::InvalidAccessToken { .. } => {
                "Generate a new access token in Canvas or pass --token to enter one interactively"
                    .to_string()
            }
            GroupsError::ResourceNotFound { .. } => {
                "Check the course id (the number in the course URL) and your access to it"
                    .to_string()
            }
            GroupsError::RemoteError { status, .. } if *status == 401 || *status == 403 => {
                "Your token does not have permission to manage groups in this course".to_string()
            }
            GroupsError::RemoteError { .. } => {
                "Canvas refused the request; groups created so far are left in place".to_string()
            }
            GroupsError::SerializationError { .. } => {
                "Check that the URL points at a Canvas instance".to_string()
            }
            GroupsError::IoError(_) => "Check file permissions and paths".to_string(),
            GroupsError::MissingToken { var } => format!(
                "Set the {} environment variable or pass --token to enter the token interactively",
                var
            ),
            GroupsError::PromptError { .. } => {
                "Run from an interactive terminal or provide the token through the environment"
                    .to_string()
            }
            GroupsError::ConfigError { .. } | GroupsError::InvalidConfigValueError { .. } => {
                "Review the command-line arguments and settings file".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, GroupsError>;
