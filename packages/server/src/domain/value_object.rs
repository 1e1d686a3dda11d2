//! Value Object 定義
//!
//! 外部から入ってくる文字列は必ずここで検証してからドメインに入れる。

use serde::Serialize;
use uuid::Uuid;

use super::ValueObjectError;

/// 表示名の最大文字数
pub const AUTHOR_NAME_MAX_CHARS: usize = 20;
/// 作者 ID の文字数（UUID v4 の hex 表現）
pub const AUTHOR_ID_LEN: usize = 32;
/// メッセージ本文の最大文字数
pub const MESSAGE_TEXT_MAX_CHARS: usize = 2000;

/// 作者の表示名（スロットルのキー）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AuthorName(String);

impl AuthorName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::AuthorNameEmpty);
        }
        let len = value.chars().count();
        if len > AUTHOR_NAME_MAX_CHARS {
            return Err(ValueObjectError::AuthorNameTooLong {
                max: AUTHOR_NAME_MAX_CHARS,
                actual: len,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for AuthorName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for AuthorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 作者の安定 ID（32 文字の英数字）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AuthorId(String);

impl AuthorId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.len() != AUTHOR_ID_LEN || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ValueObjectError::InvalidAuthorId(value));
        }
        Ok(Self(value))
    }

    /// 新しい作者 ID を生成（UUID v4 の hex）
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for AuthorId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// メッセージ本文
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageText(String);

impl MessageText {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::MessageTextEmpty);
        }
        let len = value.chars().count();
        if len > MESSAGE_TEXT_MAX_CHARS {
            return Err(ValueObjectError::MessageTextTooLong {
                max: MESSAGE_TEXT_MAX_CHARS,
                actual: len,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// ストアが採番するメッセージ ID（単調増加）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MessageId(i64);

impl MessageId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// WebSocket 接続ごとの ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// アクセストークン（所持していることが本人性の証明になる）
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::AccessTokenEmpty);
        }
        Ok(Self(value))
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// トークンをログに出さない
impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Unix タイムスタンプ（UTC, ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_name_accepts_max_length() {
        // テスト項目: 20 文字ちょうどの表示名は受け入れられる
        // given (前提条件):
        let name = "a".repeat(AUTHOR_NAME_MAX_CHARS);

        // when (操作):
        let result = AuthorName::new(name.clone());

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), name);
    }

    #[test]
    fn test_author_name_rejects_too_long() {
        // テスト項目: 21 文字の表示名は拒否される（マルチバイト文字も 1 文字として数える）
        // given (前提条件):
        let name = "あ".repeat(AUTHOR_NAME_MAX_CHARS + 1);

        // when (操作):
        let result = AuthorName::new(name);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ValueObjectError::AuthorNameTooLong {
                max: AUTHOR_NAME_MAX_CHARS,
                actual: AUTHOR_NAME_MAX_CHARS + 1,
            })
        );
    }

    #[test]
    fn test_author_name_rejects_blank() {
        // テスト項目: 空白のみの表示名は拒否される
        // given (前提条件):
        let name = "   ".to_string();

        // when (操作):
        let result = AuthorName::new(name);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::AuthorNameEmpty));
    }

    #[test]
    fn test_author_id_generate_is_valid() {
        // テスト項目: 生成された作者 ID は検証を通る 32 文字の文字列である
        // given (前提条件):
        let generated = AuthorId::generate();

        // when (操作):
        let reparsed = AuthorId::new(generated.as_str().to_string());

        // then (期待する結果):
        assert_eq!(generated.as_str().len(), AUTHOR_ID_LEN);
        assert_eq!(reparsed, Ok(generated));
    }

    #[test]
    fn test_author_id_rejects_wrong_length_and_symbols() {
        // テスト項目: 長さや文字種が不正な作者 ID は拒否される
        // given (前提条件):
        let short = "abc".to_string();
        let with_dashes = "0123456789abcdef-123456789abcdef".to_string();

        // when (操作):
        let short_result = AuthorId::new(short);
        let dashes_result = AuthorId::new(with_dashes);

        // then (期待する結果):
        assert!(matches!(short_result, Err(ValueObjectError::InvalidAuthorId(_))));
        assert!(matches!(dashes_result, Err(ValueObjectError::InvalidAuthorId(_))));
    }

    #[test]
    fn test_message_text_rejects_empty_and_too_long() {
        // テスト項目: 空の本文と上限超過の本文は拒否される
        // given (前提条件):
        let empty = String::new();
        let long = "x".repeat(MESSAGE_TEXT_MAX_CHARS + 1);

        // when (操作):
        let empty_result = MessageText::new(empty);
        let long_result = MessageText::new(long);

        // then (期待する結果):
        assert_eq!(empty_result, Err(ValueObjectError::MessageTextEmpty));
        assert!(matches!(
            long_result,
            Err(ValueObjectError::MessageTextTooLong { .. })
        ));
    }

    #[test]
    fn test_access_token_debug_is_redacted() {
        // テスト項目: アクセストークンの Debug 表示に値が含まれない
        // given (前提条件):
        let token = AccessToken::new("secret-token".to_string()).unwrap();

        // when (操作):
        let debug = format!("{:?}", token);

        // then (期待する結果):
        assert!(!debug.contains("secret-token"));
    }
}
