use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use playlist_primitives::SONGS_PER_PLAYLIST;
use serde::Serialize;
use wallet_session::SongEntry;

/// Cover image reference embedded in every playlist's metadata
const COVER_IMAGE: &str = "ipfs://bafkreicecnx2gvntm6fbcrvnc336qze6st5u7qq7457igegamd3bzkx7ri";

#[derive(Debug, Clone, Serialize)]
pub struct MetadataAttribute {
    pub trait_type: String,
    pub value: serde_json::Value,
}

/// Token metadata record for a minted playlist.
///
/// Encoded as a self-contained `data:` locator rather than pinned, so
/// the token remains resolvable without any storage dependency.
#[derive(Debug, Clone, Serialize)]
pub struct MetadataRecord {
    pub name: String,
    pub description: String,
    pub creator: String,
    pub image: String,
    pub songs: Vec<SongEntry>,
    pub attributes: Vec<MetadataAttribute>,
}

impl MetadataRecord {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        creator: impl Into<String>,
        network: impl Into<String>,
        songs: Vec<SongEntry>,
    ) -> Self {
        let creator = creator.into();
        let attributes = vec![
            MetadataAttribute {
                trait_type: "Creator".to_string(),
                value: serde_json::Value::String(creator.clone()),
            },
            MetadataAttribute {
                trait_type: "Song Count".to_string(),
                value: serde_json::Value::from(SONGS_PER_PLAYLIST),
            },
            MetadataAttribute {
                trait_type: "Network".to_string(),
                value: serde_json::Value::String(network.into()),
            },
        ];

        Self {
            name: name.into(),
            description: description.into(),
            creator,
            image: COVER_IMAGE.to_string(),
            songs,
            attributes,
        }
    }

    /// Encode as `data:application/json;base64,…`
    pub fn to_data_uri(&self) -> Result<String, serde_json::Error> {
        let raw = serde_json::to_vec(self)?;
        Ok(format!(
            "data:application/json;base64,{}",
            BASE64.encode(raw)
        ))
    }
}
