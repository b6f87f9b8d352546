use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskPatch, TaskQuery};
use crate::store::TaskStore;

/// Owner-scoped task operations. Every call takes the caller's user id; a task
/// owned by someone else behaves exactly like a task that does not exist.
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, owner_id: Uuid, input: TaskInput) -> Result<Task, AppError> {
        let input = TaskInput {
            title: input.title.trim().to_string(),
        };
        input.validate()?;

        let task = self
            .store
            .insert_task(Task::new(input.title, owner_id))
            .await?;
        log::info!("User {} created task {}", owner_id, task.id);
        Ok(task)
    }

    pub async fn list(&self, owner_id: Uuid, query: &TaskQuery) -> Result<Vec<Task>, AppError> {
        self.store.list_tasks(owner_id, query).await
    }

    pub async fn get(&self, owner_id: Uuid, task_id: Uuid) -> Result<Task, AppError> {
        self.store
            .find_task(owner_id, task_id)
            .await?
            .ok_or_else(task_not_found)
    }

    pub async fn update(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
        patch: TaskPatch,
    ) -> Result<Task, AppError> {
        let patch = TaskPatch {
            title: patch.title.map(|title| title.trim().to_string()),
            status: patch.status,
        };
        patch.validate()?;

        let task = self
            .store
            .update_task(owner_id, task_id, &patch)
            .await?
            .ok_or_else(task_not_found)?;
        log::info!("User {} updated task {}", owner_id, task.id);
        Ok(task)
    }

    pub async fn delete(&self, owner_id: Uuid, task_id: Uuid) -> Result<(), AppError> {
        if !self.store.delete_task(owner_id, task_id).await? {
            return Err(task_not_found());
        }
        log::info!("User {} deleted task {}", owner_id, task_id);
        Ok(())
    }
}

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}
