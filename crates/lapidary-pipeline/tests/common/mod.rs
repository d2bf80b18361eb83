//! Shared mock collaborators for pipeline integration tests.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use lapidary_core::{
    FileStore, LanguageModelClient, ModelError, ModelResult, NoteRef, StoreError, StoreResult,
};

/// In-memory file store with error injection and call recording. Listing
/// order is insertion order.
#[derive(Clone)]
pub struct MockFileStore {
    state: Arc<Mutex<MockFileStoreState>>,
}

#[derive(Default)]
struct MockFileStoreState {
    files: Vec<(String, String)>,
    simulate_list_errors: bool,
    simulate_rename_errors: bool,
    simulate_write_errors: bool,
    rename_count: usize,
    write_count: usize,
}

impl MockFileStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockFileStoreState::default())),
        }
    }

    pub fn insert(&self, path: &str, content: &str) {
        let mut state = self.state.lock().unwrap();
        state.files.push((path.to_string(), content.to_string()));
    }

    pub fn set_simulate_list_errors(&self, enabled: bool) {
        self.state.lock().unwrap().simulate_list_errors = enabled;
    }

    pub fn set_simulate_rename_errors(&self, enabled: bool) {
        self.state.lock().unwrap().simulate_rename_errors = enabled;
    }

    pub fn set_simulate_write_errors(&self, enabled: bool) {
        self.state.lock().unwrap().simulate_write_errors = enabled;
    }

    pub fn content_of(&self, path: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state
            .files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, content)| content.clone())
    }

    pub fn paths(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.files.iter().map(|(p, _)| p.clone()).collect()
    }

    pub fn rename_count(&self) -> usize {
        self.state.lock().unwrap().rename_count
    }

    pub fn write_count(&self) -> usize {
        self.state.lock().unwrap().write_count
    }
}

#[async_trait]
impl FileStore for MockFileStore {
    async fn list(&self, dir: &str, recursive: bool) -> StoreResult<Vec<NoteRef>> {
        let state = self.state.lock().unwrap();
        if state.simulate_list_errors {
            return Err(StoreError::PermissionDenied(dir.to_string()));
        }
        let prefix = format!("{dir}/");
        Ok(state
            .files
            .iter()
            .filter(|(path, _)| {
                let Some(rest) = path.strip_prefix(&prefix) else {
                    return false;
                };
                recursive || !rest.contains('/')
            })
            .map(|(path, _)| NoteRef::new(path))
            .collect())
    }

    async fn read(&self, note: &NoteRef) -> StoreResult<String> {
        let state = self.state.lock().unwrap();
        let key = note.path().to_string_lossy();
        state
            .files
            .iter()
            .find(|(path, _)| *path == key)
            .map(|(_, content)| content.clone())
            .ok_or_else(|| StoreError::NotFound(key.into_owned()))
    }

    async fn write(&self, note: &NoteRef, text: &str) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.simulate_write_errors {
            return Err(StoreError::Io("simulated write failure".to_string()));
        }
        let key = note.path().to_string_lossy().into_owned();
        state.write_count += 1;
        match state.files.iter_mut().find(|(path, _)| *path == key) {
            Some((_, content)) => *content = text.to_string(),
            None => state.files.push((key, text.to_string())),
        }
        Ok(())
    }

    async fn rename(&self, note: &NoteRef, new_name: &str) -> StoreResult<NoteRef> {
        let mut state = self.state.lock().unwrap();
        if state.simulate_rename_errors {
            return Err(StoreError::Io("simulated rename failure".to_string()));
        }
        let key = note.path().to_string_lossy().into_owned();
        let new_path = match note.path().parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent.join(new_name),
            None => Path::new(new_name).to_path_buf(),
        };
        let new_key = new_path.to_string_lossy().into_owned();
        if state.files.iter().any(|(path, _)| *path == new_key) {
            return Err(StoreError::AlreadyExists(new_key));
        }
        let entry = state
            .files
            .iter_mut()
            .find(|(path, _)| *path == key)
            .ok_or(StoreError::NotFound(key))?;
        entry.0 = new_key.clone();
        state.rename_count += 1;
        Ok(NoteRef::new(new_key))
    }
}

/// Scripted model client with error injection and prompt recording.
#[derive(Clone)]
pub struct MockModelClient {
    state: Arc<Mutex<MockModelClientState>>,
}

struct MockModelClientState {
    response: String,
    simulate_errors: bool,
    error: ModelError,
    send_count: usize,
    last_user_prompt: Option<String>,
}

impl MockModelClient {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockModelClientState {
                response: enhancement_json("- Buy milk"),
                simulate_errors: false,
                error: ModelError::RateLimited,
                send_count: 0,
                last_user_prompt: None,
            })),
        }
    }

    pub fn set_response(&self, response: &str) {
        self.state.lock().unwrap().response = response.to_string();
    }

    pub fn set_simulate_errors(&self, enabled: bool, error: ModelError) {
        let mut state = self.state.lock().unwrap();
        state.simulate_errors = enabled;
        state.error = error;
    }

    pub fn send_count(&self) -> usize {
        self.state.lock().unwrap().send_count
    }

    pub fn last_user_prompt(&self) -> Option<String> {
        self.state.lock().unwrap().last_user_prompt.clone()
    }
}

#[async_trait]
impl LanguageModelClient for MockModelClient {
    async fn send(&self, _system_prompt: &str, user_prompt: &str) -> ModelResult<String> {
        let mut state = self.state.lock().unwrap();
        state.send_count += 1;
        state.last_user_prompt = Some(user_prompt.to_string());
        if state.simulate_errors {
            return Err(state.error.clone());
        }
        Ok(state.response.clone())
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

/// A well-formed enhancement response with a bare tag (exercises `#`
/// normalization on the way through).
pub fn enhancement_json(content: &str) -> String {
    serde_json::json!({
        "content": content,
        "metadata": {"summary": "Grocery list", "tags": ["errand"]}
    })
    .to_string()
}
