//! Value Object 定義
//!
//! ドメインで扱う識別子・名前・時刻を型として表現します。
//! 生成時に検証を行い、不正な値はドメイン層に入り込みません。

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// Number of characters in a room identifier
pub const ROOM_ID_LENGTH: usize = 6;

/// Symbols a room identifier is drawn from (uppercase letters + digits)
pub const ROOM_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Maximum length of a display name (in characters)
pub const DISPLAY_NAME_MAX_LENGTH: usize = 64;

/// Display name used until a session supplies one
pub const DISPLAY_NAME_PLACEHOLDER: &str = "Unknown";

/// Room identifier: exactly 6 characters over `[A-Z0-9]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    /// Create a new RoomId, validating its format.
    ///
    /// Surrounding whitespace is ignored; case is significant.
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.len() != ROOM_ID_LENGTH {
            return Err(ValueObjectError::InvalidRoomId(value));
        }
        if !trimmed.bytes().all(|b| ROOM_ID_ALPHABET.contains(&b)) {
            return Err(ValueObjectError::InvalidRoomId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Wrap an identifier built from `ROOM_ID_ALPHABET` by a generator
    pub(crate) fn from_generated(value: String) -> Self {
        debug_assert!(
            value.len() == ROOM_ID_LENGTH && value.bytes().all(|b| ROOM_ID_ALPHABET.contains(&b))
        );
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

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
        f.write_str(&self.0)
    }
}

/// Transport-level connection identifier
///
/// Generated by the server for every accepted connection. Rooms only hold it
/// as a lookup key; the connection itself is owned by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Generate a fresh identifier (UUID v4)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyConnectionId);
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

impl TryFrom<String> for ConnectionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Member display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a display name. Blank input yields the placeholder.
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(Self::placeholder());
        }
        let length = trimmed.chars().count();
        if length > DISPLAY_NAME_MAX_LENGTH {
            return Err(ValueObjectError::DisplayNameTooLong {
                length,
                max: DISPLAY_NAME_MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn placeholder() -> Self {
        Self(DISPLAY_NAME_PLACEHOLDER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for DisplayName {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unix timestamp in milliseconds (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
