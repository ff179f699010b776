use crate::domain::model::{CanvasUser, Course, Group, GroupCategory, Membership};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The Canvas operations the provisioner consumes.
#[async_trait]
pub trait CanvasApi: Send + Sync {
    async fn get_course(&self, course_id: u64) -> Result<Course>;
    async fn create_group_category(&self, course_id: u64, name: &str) -> Result<GroupCategory>;
    async fn create_group(&self, category: &GroupCategory, name: &str) -> Result<Group>;
    async fn list_course_users(&self, course_id: u64) -> Result<Vec<CanvasUser>>;
    async fn create_membership(&self, group: &Group, user_id: u64) -> Result<Membership>;
}

/// Source of secrets keyed by name, normally the process environment.
pub trait CredentialStore {
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Reads a secret from the user without echoing it.
pub trait SecretPrompt {
    fn read_secret(&self, prompt: &str) -> Result<String>;
}
