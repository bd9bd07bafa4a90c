//! HTTP client for the gateway's same-origin proxy routes.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde_json::Value;
use std::rc::Rc;
use thiserror::Error;

use taskdeck_api::{
    CreateTaskRequest, LoginRequest, LoginResponse, TaskFilterRequest, UpdateTaskRequest,
};

use crate::session::Session;

const LOGIN_URL: &str = "/api/auth/login";
const TASK_BASE: &str = "/api/task";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The gateway itself could not be reached.
    #[error("could not reach the server")]
    Connection(gloo_net::Error),

    /// The response body was not the JSON we expected.
    #[error("unexpected response from the server")]
    Decode(serde_json::Error),

    /// The backend answered with a failure status; the payload is its
    /// `message` when one was present.
    #[error("{0}")]
    Backend(String),
}

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(err) => ApiError::Decode(err),
            other => ApiError::Connection(other),
        }
    }
}

pub struct ApiClient {
    session: Rc<Session>,
}

impl ApiClient {
    pub fn new(session: Rc<Session>) -> Rc<Self> {
        Rc::new(Self { session })
    }

    /// `POST /api/auth/login`. The only unauthenticated call.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let response = Request::post(LOGIN_URL).json(request)?.send().await?;
        if !response.ok() {
            return Err(failure(response).await);
        }
        Ok(response.json::<LoginResponse>().await?)
    }

    pub async fn create_task(&self, request: &CreateTaskRequest) -> Result<(), ApiError> {
        let response = self
            .authorized(Request::post(TASK_BASE))
            .json(request)?
            .send()
            .await?;
        expect_ok(response).await
    }

    pub async fn update_task(&self, id: u64, request: &UpdateTaskRequest) -> Result<(), ApiError> {
        let url = format!("{TASK_BASE}/{id}");
        let response = self
            .authorized(Request::put(&url))
            .json(request)?
            .send()
            .await?;
        expect_ok(response).await
    }

    pub async fn delete_task(&self, id: u64) -> Result<(), ApiError> {
        let url = format!("{TASK_BASE}/{id}");
        let response = self.authorized(Request::delete(&url)).send().await?;
        expect_ok(response).await
    }

    /// `POST /api/task/byfilter`. Returns the raw JSON body; the caller
    /// decides what a usable listing shape looks like.
    pub async fn tasks_by_filter(&self, filter: &TaskFilterRequest) -> Result<Value, ApiError> {
        let url = format!("{TASK_BASE}/byfilter");
        let response = self
            .authorized(Request::post(&url))
            .json(filter)?
            .send()
            .await?;
        if !response.ok() {
            return Err(failure(response).await);
        }
        Ok(response.json::<Value>().await?)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.header("Authorization", &format!("Bearer {token}")),
            None => request,
        }
    }
}

async fn expect_ok(response: Response) -> Result<(), ApiError> {
    if response.ok() {
        Ok(())
    } else {
        Err(failure(response).await)
    }
}

/// Turn a non-2xx response into the backend's own message when it sent one.
async fn failure(response: Response) -> ApiError {
    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("Request failed")
        .to_string();
    ApiError::Backend(message)
}
