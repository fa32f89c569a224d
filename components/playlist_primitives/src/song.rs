use crate::ids::{base36_token, SongId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("unsupported storage scheme: {0}")]
    UnsupportedScheme(String),
}

/// Local audio file handle selected by the user
///
/// Ephemeral by contract: it exists only for the lifetime of the current
/// session and is never persisted (the owning `Song` field is skipped
/// during serialization).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    pub name: String,
    pub path: PathBuf,
}

impl AudioFile {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Derive the handle from a filesystem path
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, path }
    }

    /// File name with the extension stripped, used as a default song title
    pub fn title_hint(&self) -> String {
        match self.name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => self.name.clone(),
        }
    }
}

/// Resolved playable-audio locator
///
/// `Remote` locators (http/https gateway URLs) are durable across
/// reloads. `Transient` locators reference in-memory session data
/// (`mem://`, `blob:`, `data:` schemes) and become invalid once the
/// session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioLocator {
    Remote(String),
    Transient(String),
}

impl AudioLocator {
    /// Classify a raw locator string by scheme
    pub fn from_uri(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        if uri.starts_with("mem://") || uri.starts_with("blob:") || uri.starts_with("data:") {
            AudioLocator::Transient(uri)
        } else {
            AudioLocator::Remote(uri)
        }
    }

    /// Fresh in-memory locator for a just-selected file
    pub fn transient_for(file: &AudioFile) -> Self {
        AudioLocator::Transient(format!("mem://{}/{}", base36_token(12), file.name))
    }

    /// Pick the playable locator for a song: an already-resolved locator
    /// wins over generating a fresh transient one from the file handle,
    /// so durable gateway URLs survive where blob-style locators would
    /// be lost on reload.
    pub fn resolve(existing: Option<AudioLocator>, file: Option<&AudioFile>) -> Option<AudioLocator> {
        existing.or_else(|| file.map(AudioLocator::transient_for))
    }

    pub fn is_durable(&self) -> bool {
        matches!(self, AudioLocator::Remote(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            AudioLocator::Remote(uri) | AudioLocator::Transient(uri) => uri,
        }
    }
}

impl From<AudioLocator> for String {
    fn from(locator: AudioLocator) -> String {
        match locator {
            AudioLocator::Remote(uri) | AudioLocator::Transient(uri) => uri,
        }
    }
}

impl From<String> for AudioLocator {
    fn from(raw: String) -> Self {
        AudioLocator::from_uri(raw)
    }
}

impl Serialize for AudioLocator {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AudioLocator {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(AudioLocator::from_uri(String::deserialize(deserializer)?))
    }
}

/// Content-addressed storage reference (`ipfs://<hash>`)
///
/// The `mock-ipfs://` scheme is admitted for the development fallback
/// used when no pinning credentials are configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageUri(String);

impl StorageUri {
    pub const SCHEME: &'static str = "ipfs://";
    pub const MOCK_SCHEME: &'static str = "mock-ipfs://";

    /// Wrap a content hash into a canonical `ipfs://` reference
    pub fn from_hash(hash: impl AsRef<str>) -> Self {
        Self(format!("{}{}", Self::SCHEME, hash.as_ref()))
    }

    /// Development fallback reference for an unpinned file
    pub fn mock(name: impl AsRef<str>) -> Self {
        Self(format!("{}{}", Self::MOCK_SCHEME, name.as_ref()))
    }

    /// The content hash (or mock name) without its scheme prefix
    pub fn hash(&self) -> &str {
        self.0
            .strip_prefix(Self::SCHEME)
            .or_else(|| self.0.strip_prefix(Self::MOCK_SCHEME))
            .unwrap_or(&self.0)
    }

    /// True for real content-addressed references, false for the mock
    /// fallback (which no gateway can serve).
    pub fn is_content_addressed(&self) -> bool {
        self.0.starts_with(Self::SCHEME)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for StorageUri {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with(Self::SCHEME) || s.starts_with(Self::MOCK_SCHEME) {
            Ok(Self(s.to_string()))
        } else {
            Err(LocatorError::UnsupportedScheme(s.to_string()))
        }
    }
}

impl fmt::Display for StorageUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One song slot of a playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    pub title: String,

    // File handles cannot survive serialization; persisted songs are
    // rehydrated with this field empty.
    #[serde(skip)]
    pub file: Option<AudioFile>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioLocator>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_uri: Option<StorageUri>,
}

impl Song {
    /// Empty slot with a stable per-position id
    pub fn slot(index: usize) -> Self {
        Self {
            id: SongId::for_slot(index),
            title: String::new(),
            file: None,
            audio: None,
            storage_uri: None,
        }
    }

    /// A slot is mint-ready once it has both a title and a source file
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && self.file.is_some()
    }
}
