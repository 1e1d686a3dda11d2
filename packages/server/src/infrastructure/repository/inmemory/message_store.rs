//! InMemory MessageStore 実装
//!
//! Vec を追記専用ログとして使用します。ID は 1 から採番します。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Message, MessageId, MessageStore, NewMessage, StoreError};

#[derive(Default)]
struct Log {
    messages: Vec<Message>,
    last_id: i64,
}

/// インメモリ MessageStore 実装
#[derive(Default)]
pub struct InMemoryMessageStore {
    log: Mutex<Log>,
}

impl InMemoryMessageStore {
    /// 新しい InMemoryMessageStore を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(&self, message: NewMessage) -> Result<MessageId, StoreError> {
        let mut log = self.log.lock().await;
        log.last_id += 1;
        let id = MessageId::new(log.last_id);
        log.messages.push(message.into_message(id));
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<Message>, StoreError> {
        let log = self.log.lock().await;
        Ok(log.messages.clone())
    }
}
