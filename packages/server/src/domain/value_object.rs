//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// Maximum length of user and room identifiers
const MAX_ID_LENGTH: usize = 100;

/// Length of the short room ids handed out by the REST API
pub const SHORT_ROOM_ID_LENGTH: usize = 8;

/// Client identifier value object.
///
/// Opaque identifier of the user behind a connection. Uniqueness is not
/// required: the same user may hold several connections at once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(String);

impl ClientId {
    /// Create a new ClientId.
    ///
    /// # Arguments
    ///
    /// * `id` - The client identifier string
    ///
    /// # Returns
    ///
    /// A Result containing the ClientId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::ClientIdEmpty);
        }
        let len = id.len();
        if len > MAX_ID_LENGTH {
            return Err(ValueObjectError::ClientIdTooLong {
                max: MAX_ID_LENGTH,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ClientId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room identifier value object.
///
/// The core only needs a non-empty key; the stricter short-id format used
/// by the REST API is checked with [`RoomId::is_short_id`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    /// Create a new RoomId.
    ///
    /// # Arguments
    ///
    /// * `id` - The room identifier string
    ///
    /// # Returns
    ///
    /// A Result containing the RoomId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::RoomIdEmpty);
        }
        let len = id.len();
        if len > MAX_ID_LENGTH {
            return Err(ValueObjectError::RoomIdTooLong {
                max: MAX_ID_LENGTH,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Whether the id is an 8 character URL-safe short id (`[A-Za-z0-9_-]{8}`).
    pub fn is_short_id(&self) -> bool {
        self.0.len() == SHORT_ROOM_ID_LENGTH
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one accepted connection.
///
/// Two connections of the same user are two registry entries, so the
/// registry keys on this instead of [`ClientId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(uuid::Uuid);

impl ConnectionId {
    /// Generate a fresh random connection id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tempo in beats per minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tempo(u32);

impl Tempo {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 1000;
    pub const DEFAULT: u32 = 128;

    /// Create a new Tempo, rejecting values outside `MIN..=MAX`.
    pub fn new(bpm: u32) -> Result<Self, ValueObjectError> {
        if !(Self::MIN..=Self::MAX).contains(&bpm) {
            return Err(ValueObjectError::TempoOutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                actual: bpm,
            });
        }
        Ok(Self(bpm))
    }

    /// Get the BPM value.
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Length of one beat in milliseconds.
    pub fn beat_interval_ms(&self) -> f64 {
        60_000.0 / f64::from(self.0)
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Beats per measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Beats(u32);

impl Beats {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 64;
    pub const DEFAULT: u32 = 4;

    /// Create a new Beats value, rejecting values outside `MIN..=MAX`.
    pub fn new(beats: u32) -> Result<Self, ValueObjectError> {
        if !(Self::MIN..=Self::MAX).contains(&beats) {
            return Err(ValueObjectError::BeatsOutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                actual: beats,
            });
        }
        Ok(Self(beats))
    }

    /// Get the beats-per-measure value.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Default for Beats {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl fmt::Display for Beats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp.
    ///
    /// # Arguments
    ///
    /// * `value` - Unix timestamp in milliseconds
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_new_success() {
        // テスト項目: 有効なクライアント ID を作成できる
        // given (前提条件):
        let id = "alice".to_string();

        // when (操作):
        let result = ClientId::new(id);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "alice");
    }

    #[test]
    fn test_client_id_new_empty_fails() {
        // テスト項目: 空のクライアント ID は作成できない
        // given (前提条件):
        let id = "".to_string();

        // when (操作):
        let result = ClientId::new(id);

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::ClientIdEmpty);
    }

    #[test]
    fn test_client_id_new_too_long_fails() {
        // テスト項目: 101 文字以上のクライアント ID は作成できない
        // given (前提条件):
        let id = "a".repeat(101);

        // when (操作):
        let result = ClientId::new(id);

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::ClientIdTooLong {
                max: 100,
                actual: 101
            }
        );
    }

    #[test]
    fn test_room_id_new_empty_fails() {
        // テスト項目: 空のルーム ID は作成できない
        // given (前提条件):
        let id = "".to_string();

        // when (操作):
        let result = RoomId::try_from(id);

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::RoomIdEmpty);
    }

    #[test]
    fn test_room_id_is_short_id() {
        // テスト項目: 8 文字の URL-safe な ID のみ short id と判定される
        // given (前提条件):
        let valid = RoomId::new("aZ09_-xY".to_string()).unwrap();
        let too_short = RoomId::new("abc".to_string()).unwrap();
        let bad_char = RoomId::new("abcd!fgh".to_string()).unwrap();
        let non_ascii = RoomId::new("abcdefgé".to_string()).unwrap();

        // then (期待する結果):
        assert!(valid.is_short_id());
        assert!(!too_short.is_short_id());
        assert!(!bad_char.is_short_id());
        assert!(!non_ascii.is_short_id());
    }

    #[test]
    fn test_connection_id_is_unique() {
        // テスト項目: ConnectionId は生成のたびに異なる
        // when (操作):
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();

        // then (期待する結果):
        assert_ne!(a, b);
    }

    #[test]
    fn test_tempo_range() {
        // テスト項目: テンポは 1..=1000 BPM のみ受け付ける
        // then (期待する結果):
        assert!(Tempo::new(1).is_ok());
        assert!(Tempo::new(1000).is_ok());
        assert_eq!(
            Tempo::new(0).unwrap_err(),
            ValueObjectError::TempoOutOfRange {
                min: 1,
                max: 1000,
                actual: 0
            }
        );
        assert!(Tempo::new(1001).is_err());
        assert_eq!(Tempo::default().value(), 128);
    }

    #[test]
    fn test_tempo_beat_interval() {
        // テスト項目: 1 拍の長さ (ms) が 60000 / BPM になる
        // given (前提条件):
        let tempo = Tempo::new(120).unwrap();

        // then (期待する結果):
        assert_eq!(tempo.beat_interval_ms(), 500.0);
    }

    #[test]
    fn test_beats_range() {
        // テスト項目: 拍子は 1..=64 のみ受け付け、デフォルトは 4
        // then (期待する結果):
        assert!(Beats::new(3).is_ok());
        assert!(Beats::new(0).is_err());
        assert!(Beats::new(65).is_err());
        assert_eq!(Beats::default().value(), 4);
    }

    #[test]
    fn test_timestamp_ordering() {
        // テスト項目: タイムスタンプは順序付けできる
        // given (前提条件):
        let ts1 = Timestamp::new(1000);
        let ts2 = Timestamp::new(2000);

        // then (期待する結果):
        assert!(ts1 < ts2);
        assert_eq!(ts2.value(), 2000);
    }
}
