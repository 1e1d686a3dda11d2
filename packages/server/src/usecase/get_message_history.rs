//! UseCase: メッセージ履歴の取得

use std::sync::Arc;

use crate::domain::{Message, MessageStore};

use super::error::GetMessageHistoryError;

/// メッセージ履歴取得のユースケース
pub struct GetMessageHistoryUseCase {
    /// MessageStore（追記専用のメッセージストア）
    store: Arc<dyn MessageStore>,
}

impl GetMessageHistoryUseCase {
    /// 新しい GetMessageHistoryUseCase を作成
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// 全メッセージを追記順に取得
    pub async fn execute(&self) -> Result<Vec<Message>, GetMessageHistoryError> {
        Ok(self.store.list_all().await?)
    }
}
