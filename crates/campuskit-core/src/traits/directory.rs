//! User directory trait — the external identity provider.

use async_trait::async_trait;
use uuid::Uuid;

use crate::result::AppResult;
use crate::user::{CreateUser, User};

/// Lookup and lifecycle of user records.
///
/// Persistence is out of scope for the session core; the directory is an
/// external collaborator (a database-backed service in production, an
/// in-memory map in tests). Lookups model "absent" as `Ok(None)`, never as
/// an error — the session core decides which absences are failures.
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Finds a user by login email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Finds a user by subject identifier.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Creates a new user record and returns it with its assigned id.
    async fn create(&self, attrs: CreateUser) -> AppResult<User>;

    /// Deletes a user record.
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}
