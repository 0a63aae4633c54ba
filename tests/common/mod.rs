//! Common test utilities for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use kanban_mcp::settings::DisplaySettings;
use kanban_mcp::{
    BoardSession, ColumnDescriptor, Item, PersistenceClient, PersistenceError, UpdatedItem,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Persistence client that records every call and fails on demand
///
/// A gated client holds every confirmation until the test releases a permit,
/// which keeps mutations pending for as long as the test needs.
#[derive(Default)]
pub struct RecordingClient {
    calls: Mutex<Vec<(String, String)>>,
    failures: Mutex<HashMap<String, PersistenceError>>,
    gate: Option<Arc<Semaphore>>,
}

impl RecordingClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn gated() -> (Arc<Self>, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let client = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::default()
        };
        (Arc::new(client), gate)
    }

    /// Make every commit of `item_id` fail with `error`
    pub fn fail(&self, item_id: &str, error: PersistenceError) {
        self.failures
            .lock()
            .unwrap()
            .insert(item_id.to_string(), error);
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PersistenceClient for RecordingClient {
    async fn commit_status(
        &self,
        item_id: &str,
        new_status: &str,
    ) -> Result<UpdatedItem, PersistenceError> {
        self.calls
            .lock()
            .unwrap()
            .push((item_id.to_string(), new_status.to_string()));

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        let failure = self.failures.lock().unwrap().get(item_id).cloned();
        match failure {
            Some(error) => Err(error),
            None => Ok(UpdatedItem {
                id: item_id.to_string(),
                status: new_status.to_string(),
            }),
        }
    }
}

pub fn sample_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("todo", "To Do"),
        ColumnDescriptor::new("in_progress", "In Progress"),
        ColumnDescriptor::new("done", "Done"),
    ]
}

/// Four items, one of them ("T3", status "archived") orphaned
pub fn sample_items() -> Vec<Item> {
    let mut docs = Item::new("T2", "in_progress", "Write docs");
    docs.assignee = Some("sam".to_string());
    vec![
        Item::new("T1", "todo", "Fix bug"),
        docs,
        Item::new("T3", "archived", "Old work"),
        Item::new("T4", "done", "Release 0.1"),
    ]
}

pub fn sample_session(client: Arc<dyn PersistenceClient>) -> BoardSession {
    BoardSession::new(
        sample_columns(),
        sample_items(),
        client,
        &DisplaySettings::default(),
    )
    .unwrap()
}

/// Statuses of all sample items, by id
pub fn statuses(session: &BoardSession) -> HashMap<String, String> {
    ["T1", "T2", "T3", "T4"]
        .iter()
        .filter_map(|id| session.item(id).map(|i| (i.id, i.status)))
        .collect()
}

/// Let spawned confirmation tasks run until nothing is pending
pub async fn wait_until_settled(session: &BoardSession) {
    for _ in 0..1000 {
        if session.coordinator().pending_count() == 0 {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("mutations still pending");
}
