pub mod task;
pub mod user;

pub use task::{Task, TaskInput, TaskPatch, TaskQuery, TaskStatus};
pub use user::{UpdateProfileRequest, User, UserProfile};
