//! Persistence seams.
//!
//! Services only see the [`UserStore`] and [`TaskStore`] traits. [`PgStore`] backs
//! them with PostgreSQL; [`InMemoryStore`] keeps everything in process and is used
//! by tests and by the server when no database is configured.
//!
//! Every task operation takes the owner id and filters on it in the same step as
//! the lookup, so a task that belongs to someone else is indistinguishable from a
//! missing one.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskPatch, TaskQuery, User};

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `AppError::Conflict` when the email is already taken.
    async fn insert_user(&self, user: User) -> Result<User, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Overwrites the given fields. `Ok(None)` if the user does not exist,
    /// `AppError::Conflict` if `email` belongs to another user.
    async fn update_user_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert_task(&self, task: Task) -> Result<Task, AppError>;

    /// Tasks owned by `owner` that match `query`, oldest first.
    async fn list_tasks(&self, owner: Uuid, query: &TaskQuery) -> Result<Vec<Task>, AppError>;

    async fn find_task(&self, owner: Uuid, id: Uuid) -> Result<Option<Task>, AppError>;

    /// `Ok(None)` unless a task with `id` owned by `owner` exists.
    async fn update_task(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: &TaskPatch,
    ) -> Result<Option<Task>, AppError>;

    /// `Ok(false)` unless a task with `id` owned by `owner` was removed.
    async fn delete_task(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError>;
}
