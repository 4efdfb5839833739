//! Factories for domain identifiers.

use super::value_object::{RoomId, SHORT_ROOM_ID_LENGTH};
use super::ValueObjectError;

/// URL-safe alphabet for short room ids (64 symbols).
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Generates short room ids from UUID v4 randomness.
pub struct RoomIdFactory;

impl RoomIdFactory {
    /// Generate a new 8 character room id.
    pub fn generate() -> Result<RoomId, ValueObjectError> {
        let bytes = uuid::Uuid::new_v4().into_bytes();
        let id: String = bytes
            .iter()
            .take(SHORT_ROOM_ID_LENGTH)
            .map(|b| char::from(ALPHABET[usize::from(b & 0x3f)]))
            .collect();
        RoomId::new(id)
    }
}
