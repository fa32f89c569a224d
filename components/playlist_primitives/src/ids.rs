use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Random base36 token, used for id suffixes and transient locators
pub(crate) fn base36_token(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// Identifier of a locally created playlist
///
/// Generated once at creation time as a time+random composite, so ids
/// stay unique across tabs without any coordination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(String);

impl PlaylistId {
    pub fn generate() -> Self {
        Self(format!(
            "playlist-{}-{}",
            Utc::now().timestamp_millis(),
            base36_token(9)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PlaylistId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a song slot within a playlist (slots 0..11)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(String);

impl SongId {
    pub fn for_slot(index: usize) -> Self {
        Self(format!("song-{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SongId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Reference to a confirmed mint transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl TxHash {
    /// Abbreviated form for status messages, e.g. `0x12345678…`
    pub fn short(&self) -> String {
        if self.0.len() > 10 {
            format!("{}…", &self.0[..10])
        } else {
            self.0.clone()
        }
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
