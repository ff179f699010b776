use crate::adapters::canvas::CanvasClient;
use crate::domain::model::Course;
use crate::domain::ports::{CanvasApi, CredentialStore, SecretPrompt};
use crate::utils::error::{GroupsError, Result};

pub const DEFAULT_TOKEN_ENV: &str = "CANVAS_API";

/// Where the Canvas access token comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// Read from the configured environment variable.
    Implicit,
    Explicit(String),
    /// Ask on the terminal with input hidden.
    Interactive,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub api_url: String,
    pub course_id: u64,
    pub token_env: String,
}

/// A connected API handle together with the course it resolved.
#[derive(Debug, Clone)]
pub struct AuthenticatedCourse<A: CanvasApi> {
    pub api: A,
    pub course: Course,
}

pub fn resolve_token<C, P>(
    source: &TokenSource,
    token_env: &str,
    credentials: &C,
    prompt: &P,
) -> Result<String>
where
    C: CredentialStore + ?Sized,
    P: SecretPrompt + ?Sized,
{
    match source {
        TokenSource::Implicit => {
            credentials
                .lookup(token_env)
                .ok_or_else(|| GroupsError::MissingToken {
                    var: token_env.to_string(),
                })
        }
        TokenSource::Explicit(token) => Ok(token.clone()),
        TokenSource::Interactive => {
            println!("Please paste your Canvas API token and press enter:");
            let token = prompt.read_secret("Token")?;
            println!("Token entered.");
            println!();
            Ok(token)
        }
    }
}

fn access_hint(source: &TokenSource) -> &'static str {
    match source {
        TokenSource::Interactive => {
            "A token was entered but the course could not be accessed. \
             Check the course id and that the token is still valid."
        }
        TokenSource::Implicit | TokenSource::Explicit(_) => {
            "A token was found but the course could not be accessed. \
             Check the course id and that the token is still valid, \
             or pass --token to enter a token interactively."
        }
    }
}

/// Resolves the token, connects to Canvas and fetches the course. Failures
/// after the token is resolved print a hint and return the original error.
pub async fn authenticate<C, P>(
    settings: &SessionSettings,
    source: &TokenSource,
    credentials: &C,
    prompt: &P,
) -> Result<AuthenticatedCourse<CanvasClient>>
where
    C: CredentialStore + ?Sized,
    P: SecretPrompt + ?Sized,
{
    let token = resolve_token(source, &settings.token_env, credentials, prompt)?;

    let attempt = async {
        let api = CanvasClient::new(&settings.api_url, &token)?;
        let course = api.get_course(settings.course_id).await?;
        Ok::<_, GroupsError>(AuthenticatedCourse { api, course })
    };

    match attempt.await {
        Ok(session) => {
            tracing::info!(
                "Connected to course {} ({})",
                session.course.id,
                session.course.name.as_deref().unwrap_or("unnamed")
            );
            Ok(session)
        }
        Err(e) => {
            tracing::error!("Could not access course {}: {}", settings.course_id, e);
            println!("{}", access_hint(source));
            Err(e)
        }
    }
}
