#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use medipanel_core::{
    api::{ApiResponse, Method, RequestClient},
    config::ConfigManager,
    errors::Result,
    filter::Record,
    session::{Role, Session},
};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use tempfile::TempDir;
use uuid::Uuid;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a config manager backed by a unique directory for each test.
pub fn setup_config_env() -> ConfigManager {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    ConfigManager::with_base_dir(base).expect("create config manager for temp dir")
}

pub fn session(role: Role) -> Session {
    Session::new("test-token", role, Uuid::new_v4())
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

/// Request client that answers from a queue and remembers every call.
#[derive(Default)]
pub struct MockClient {
    responses: Mutex<VecDeque<ApiResponse>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockClient {
    pub fn answering(responses: Vec<ApiResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("lock calls").clone()
    }
}

#[async_trait]
impl RequestClient for MockClient {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        headers: &[(String, String)],
    ) -> Result<ApiResponse> {
        self.calls.lock().expect("lock calls").push(RecordedCall {
            method,
            path: path.to_string(),
            body,
            headers: headers.to_vec(),
        });
        Ok(self
            .responses
            .lock()
            .expect("lock responses")
            .pop_front()
            .unwrap_or(ApiResponse {
                success: true,
                ..ApiResponse::default()
            }))
    }
}

pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("Expected an object record, got {other}"),
    }
}

pub fn sample_patients() -> Vec<Record> {
    vec![
        record(json!({
            "id": 1,
            "full_name": "José Pérez",
            "document_id": "24123456",
            "created_at": "2024-01-15T10:00:00Z"
        })),
        record(json!({
            "id": 2,
            "full_name": "María González",
            "document_id": "18999000",
            "created_at": "2024-02-20"
        })),
        record(json!({
            "id": 3,
            "full_name": "Ángela Núñez",
            "document_id": 30111222,
            "created_at": "2024-03-05T23:30:00-04:00"
        })),
        record(json!({
            "id": 4,
            "full_name": "Pedro Lara",
            "document_id": "12000111"
        })),
    ]
}
