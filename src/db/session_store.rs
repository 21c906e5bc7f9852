//! Conversation session persistence
//!
//! Sessions are keyed by id. Writes replace the whole record, so the last
//! completed turn wins when two requests race on the same session.

use async_trait::async_trait;
use bson::doc;
use mongodb::{Client, Collection};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::db::mongo::DATABASE;
use crate::errors::ServiceResult;
use crate::models::session::ChatSession;

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session_id: &str) -> ServiceResult<Option<ChatSession>>;

    async fn put(&self, session: &ChatSession) -> ServiceResult<()>;
}

/// Process-local store, used when no database is configured
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, ChatSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session_id: &str) -> ServiceResult<Option<ChatSession>> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn put(&self, session: &ChatSession) -> ServiceResult<()> {
        self.sessions
            .write()
            .await
            .insert(session.session_id.clone(), session.clone());
        Ok(())
    }
}

pub struct MongoSessionStore {
    collection: Collection<ChatSession>,
}

impl MongoSessionStore {
    pub fn new(client: Arc<Client>) -> Self {
        Self {
            collection: client.database(DATABASE).collection("Sessions"),
        }
    }
}

#[async_trait]
impl SessionStore for MongoSessionStore {
    async fn get(&self, session_id: &str) -> ServiceResult<Option<ChatSession>> {
        Ok(self
            .collection
            .find_one(doc! { "session_id": session_id })
            .await?)
    }

    async fn put(&self, session: &ChatSession) -> ServiceResult<()> {
        self.collection
            .replace_one(doc! { "session_id": &session.session_id }, session)
            .upsert(true)
            .await?;
        Ok(())
    }
}
