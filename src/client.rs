//! Typed HTTP client for the taskboard API.
//!
//! Mirrors what the browser front end does: validates form input before
//! sending it, keeps the token returned by register/login, and attaches it as a
//! bearer token to every protected call.

use std::fmt;

use reqwest::{RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::models::{Task, TaskInput, TaskPatch, TaskQuery, UpdateProfileRequest, UserProfile};

#[derive(Debug)]
pub enum ClientError {
    /// Input rejected locally; nothing was sent.
    Validation(String),
    /// A protected call was attempted without a token.
    NotAuthenticated,
    /// The server answered with an error status.
    Api { status: StatusCode, message: String },
    /// The request could not be sent or the response could not be read.
    Transport(reqwest::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClientError::Validation(msg) => write!(f, "{}", msg),
            ClientError::NotAuthenticated => write!(f, "Not logged in"),
            ClientError::Api { status, message } => write!(f, "{} ({})", message, status),
            ClientError::Transport(err) => write!(f, "Request failed: {}", err),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<ValidationErrors> for ClientError {
    fn from(errors: ValidationErrors) -> Self {
        ClientError::Validation(errors.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        ClientError::Transport(error)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for one API base URL, e.g. `http://127.0.0.1:5000/api`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Resumes a session from a previously saved token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Forgets the token. Tokens are stateless, so the server is not contacted.
    pub fn logout(&mut self) {
        self.token = None;
    }

    pub async fn register(&mut self, request: RegisterRequest) -> Result<UserProfile, ClientError> {
        request.validate()?;
        let response: AuthResponse = send(self.http.post(self.url("/auth/register")).json(&request))
            .await?;
        self.token = Some(response.token);
        Ok(response.user)
    }

    pub async fn login(&mut self, request: LoginRequest) -> Result<UserProfile, ClientError> {
        request.validate()?;
        let response: AuthResponse =
            send(self.http.post(self.url("/auth/login")).json(&request)).await?;
        self.token = Some(response.token);
        Ok(response.user)
    }

    pub async fn profile(&self) -> Result<UserProfile, ClientError> {
        send(self.authorized(self.http.get(self.url("/user/profile")))?).await
    }

    pub async fn update_profile(
        &self,
        request: UpdateProfileRequest,
    ) -> Result<UserProfile, ClientError> {
        request.validate()?;
        send(self.authorized(self.http.put(self.url("/user/profile")))?.json(&request)).await
    }

    pub async fn tasks(&self, query: &TaskQuery) -> Result<Vec<Task>, ClientError> {
        send(self.authorized(self.http.get(self.url("/tasks")))?.query(query)).await
    }

    pub async fn create_task(&self, title: &str) -> Result<Task, ClientError> {
        let input = TaskInput {
            title: title.trim().to_string(),
        };
        if input.title.is_empty() {
            return Err(ClientError::Validation("Please enter a task title".into()));
        }
        input.validate()?;
        send(self.authorized(self.http.post(self.url("/tasks")))?.json(&input)).await
    }

    /// Flips the task between pending and completed.
    pub async fn toggle_task(&self, task: &Task) -> Result<Task, ClientError> {
        let patch = TaskPatch {
            title: None,
            status: Some(task.status.toggled()),
        };
        send(
            self.authorized(self.http.put(self.url(&format!("/tasks/{}", task.id))))?
                .json(&patch),
        )
        .await
    }

    pub async fn delete_task(&self, task_id: Uuid) -> Result<(), ClientError> {
        let response = self
            .authorized(self.http.delete(self.url(&format!("/tasks/{}", task_id))))?
            .send()
            .await?;
        check_status(response).await.map(|_| ())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::NotAuthenticated)?;
        Ok(builder.bearer_auth(token))
    }
}

async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
    let response = check_status(builder.send().await?).await?;
    Ok(response.json().await?)
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };
    Err(ClientError::Api { status, message })
}
