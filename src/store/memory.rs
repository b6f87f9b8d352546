use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{Task, TaskPatch, TaskQuery, User};

/// Process-local store. Tasks are kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    tasks: RwLock<Vec<Task>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(users: &HashMap<Uuid, User>, email: &str, except: Option<Uuid>) -> bool {
    users
        .values()
        .any(|user| user.email == email && Some(user.id) != except)
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert_user(&self, user: User) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if email_taken(&users, &user.email, None) {
            return Err(AppError::Conflict("Email already registered".into()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn update_user_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<Option<User>, AppError> {
        let mut users = self.users.write().await;
        if let Some(email) = &email {
            if email_taken(&users, email, Some(id)) {
                return Err(AppError::Conflict("Email already registered".into()));
            }
        }

        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(email) = email {
            user.email = email;
        }
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl TaskStore for InMemoryStore {
    async fn insert_task(&self, task: Task) -> Result<Task, AppError> {
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn list_tasks(&self, owner: Uuid, query: &TaskQuery) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .iter()
            .filter(|task| task.user_id == owner && query.matches(task))
            .cloned()
            .collect())
    }

    async fn find_task(&self, owner: Uuid, id: Uuid) -> Result<Option<Task>, AppError> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .iter()
            .find(|task| task.id == id && task.user_id == owner)
            .cloned())
    }

    async fn update_task(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: &TaskPatch,
    ) -> Result<Option<Task>, AppError> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks
            .iter_mut()
            .find(|task| task.id == id && task.user_id == owner)
            .map(|task| {
                task.apply(patch);
                task.clone()
            }))
    }

    async fn delete_task(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|task| !(task.id == id && task.user_id == owner));
        Ok(tasks.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;

    fn user(email: &str) -> User {
        User::new("Tester".to_string(), email.to_string(), "hash".to_string())
    }

    #[actix_rt::test]
    async fn test_duplicate_email_is_conflict() {
        let store = InMemoryStore::new();
        store.insert_user(user("a@x.com")).await.unwrap();

        let result = store.insert_user(user("a@x.com")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[actix_rt::test]
    async fn test_profile_update_rejects_taken_email() {
        let store = InMemoryStore::new();
        let alice = store.insert_user(user("a@x.com")).await.unwrap();
        store.insert_user(user("b@x.com")).await.unwrap();

        let result = store
            .update_user_profile(alice.id, None, Some("b@x.com".to_string()))
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        // Keeping one's own email is not a conflict.
        let updated = store
            .update_user_profile(alice.id, Some("Alicia".to_string()), Some("a@x.com".to_string()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Alicia");

        let missing = store
            .update_user_profile(Uuid::new_v4(), Some("Nobody".to_string()), None)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[actix_rt::test]
    async fn test_tasks_are_scoped_to_owner() {
        let store = InMemoryStore::new();
        let (owner, other) = (Uuid::new_v4(), Uuid::new_v4());
        let task = store
            .insert_task(Task::new("Mine".to_string(), owner))
            .await
            .unwrap();

        assert_eq!(store.list_tasks(owner, &TaskQuery::default()).await.unwrap().len(), 1);
        assert!(store.list_tasks(other, &TaskQuery::default()).await.unwrap().is_empty());
        assert!(store.find_task(other, task.id).await.unwrap().is_none());

        let patch = TaskPatch {
            title: None,
            status: Some(TaskStatus::Completed),
        };
        assert!(store.update_task(other, task.id, &patch).await.unwrap().is_none());
        assert!(!store.delete_task(other, task.id).await.unwrap());

        let stored = store.find_task(owner, task.id).await.unwrap().unwrap();
        assert_eq!(stored.status, TaskStatus::Pending);

        assert!(store.delete_task(owner, task.id).await.unwrap());
        assert!(store.find_task(owner, task.id).await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_list_keeps_creation_order() {
        let store = InMemoryStore::new();
        let owner = Uuid::new_v4();
        for title in ["first", "second", "third"] {
            store
                .insert_task(Task::new(title.to_string(), owner))
                .await
                .unwrap();
        }

        let titles: Vec<String> = store
            .list_tasks(owner, &TaskQuery::default())
            .await
            .unwrap()
            .into_iter()
            .map(|task| task.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }
}
