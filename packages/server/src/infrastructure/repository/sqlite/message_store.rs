//! SQLite MessageStore 実装

use async_trait::async_trait;
use rusqlite::{params, types::Type};

use super::Database;
use crate::domain::{
    AuthorId, AuthorName, Message, MessageId, MessageStore, MessageText, NewMessage, StoreError,
    Timestamp,
};

/// SQLite MessageStore 実装
///
/// ID は `AUTOINCREMENT` で採番するため、削除があっても再利用されない。
pub struct SqliteMessageStore {
    db: Database,
}

impl SqliteMessageStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageStore for SqliteMessageStore {
    async fn append(&self, message: NewMessage) -> Result<MessageId, StoreError> {
        let id = self
            .db
            .run(move |conn| {
                conn.execute(
                    "INSERT INTO messages (text, author_name, author_id, created_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        message.text.as_str(),
                        message.author_name.as_str(),
                        message.author_id.as_str(),
                        message.created_at.value(),
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(MessageId::new(id))
    }

    async fn list_all(&self) -> Result<Vec<Message>, StoreError> {
        self.db
            .run(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, text, author_name, author_id, created_at
                     FROM messages
                     ORDER BY id ASC",
                )?;
                let rows = stmt.query_map([], row_to_message)?;
                rows.collect()
            })
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let invalid = |idx: usize| {
        move |e: crate::domain::ValueObjectError| {
            rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
        }
    };

    Ok(Message {
        id: MessageId::new(row.get(0)?),
        text: MessageText::new(row.get(1)?).map_err(invalid(1))?,
        author_name: AuthorName::new(row.get(2)?).map_err(invalid(2))?,
        author_id: AuthorId::new(row.get(3)?).map_err(invalid(3))?,
        created_at: Timestamp::new(row.get(4)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_message(text: &str) -> NewMessage {
        NewMessage::new(
            MessageText::new(text.to_string()).unwrap(),
            AuthorName::new("alice".to_string()).unwrap(),
            AuthorId::generate(),
            Timestamp::new(1000),
        )
    }

    #[tokio::test]
    async fn test_append_and_list_all() {
        // テスト項目: 追記したメッセージが ID 順に取得できる
        // given (前提条件):
        let store = SqliteMessageStore::new(Database::open_in_memory().unwrap());

        // when (操作):
        let first = store.append(new_message("one")).await.unwrap();
        let second = store.append(new_message("two")).await.unwrap();
        let messages = store.list_all().await.unwrap();

        // then (期待する結果):
        assert!(first < second);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, first);
        assert_eq!(messages[0].text.as_str(), "one");
        assert_eq!(messages[1].id, second);
        assert_eq!(messages[1].created_at, Timestamp::new(1000));
    }

    #[tokio::test]
    async fn test_history_survives_reopen() {
        // テスト項目: ファイルを開き直しても履歴が残り、ID が続きから採番される
        // given (前提条件):
        let path = std::env::temp_dir().join(format!("murmur-test-{}.db", uuid::Uuid::new_v4()));
        {
            let store = SqliteMessageStore::new(Database::open(&path).unwrap());
            store.append(new_message("before restart")).await.unwrap();
        }

        // when (操作):
        let store = SqliteMessageStore::new(Database::open(&path).unwrap());
        let next = store.append(new_message("after restart")).await.unwrap();
        let messages = store.list_all().await.unwrap();

        // then (期待する結果):
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text.as_str(), "before restart");
        assert_eq!(next, MessageId::new(2));

        let _ = std::fs::remove_file(&path);
    }
}
