use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{TaskInput, TaskPatch, TaskQuery},
    tasks::TaskService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;

/// Retrieves the authenticated user's tasks, oldest first.
///
/// ## Query Parameters:
/// - `status` (optional): `pending` or `completed`.
/// - `search` (optional): case-insensitive substring of the title.
///
/// ## Responses:
/// - `200 OK`: a JSON array of `Task` objects.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn list_tasks(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUser,
    query: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let tasks = tasks.list(user.id(), &query).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new pending task owned by the authenticated user.
///
/// ## Responses:
/// - `201 Created`: the new `Task`.
/// - `400 Bad Request`: empty or overlong title, or malformed body.
/// - `401 Unauthorized`: missing or invalid token.
#[post("")]
pub async fn create_task(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUser,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = tasks.create(user.id(), task_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Retrieves one task. Tasks owned by other users are reported as not found.
#[get("/{id}")]
pub async fn get_task(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = tasks.get(user.id(), task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task's title and/or status.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `400 Bad Request`: invalid title or unknown status.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: no such task owned by the caller.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskPatch>,
) -> Result<impl Responder, AppError> {
    let task = tasks
        .update(user.id(), task_id.into_inner(), task_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task by its ID.
///
/// ## Responses:
/// - `204 No Content`: on successful deletion.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: no such task owned by the caller.
#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    tasks.delete(user.id(), task_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
