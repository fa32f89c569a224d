use crate::ids::{PlaylistId, TxHash};
use crate::song::Song;
use crate::tags::{Rarity, Theme};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed song count of a playlist NFT at mint time
pub const SONGS_PER_PLAYLIST: usize = 12;

/// A locally known playlist (created by the current user in this browser)
///
/// Created once on a successful mint and never mutated afterwards except
/// for the collect counter, which starts at 0 and only increases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub title: String,
    pub description: String,
    pub creator: String,
    pub songs: Vec<Song>,
    pub created_at: DateTime<Utc>,
    pub theme: Theme,
    pub rarity: Rarity,
    pub collects: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<TxHash>,
}

/// Playlist fields supplied by the creation flow; the store assigns the
/// id, creation timestamp, and zero collect count.
#[derive(Debug, Clone)]
pub struct PlaylistDraft {
    pub title: String,
    pub description: String,
    pub creator: String,
    pub songs: Vec<Song>,
    pub theme: Theme,
    pub rarity: Rarity,
    pub tx_hash: Option<TxHash>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playlist_round_trips_with_iso_timestamp() {
        let playlist = Playlist {
            id: PlaylistId::generate(),
            title: "Night Drive".to_string(),
            description: "Twelve tracks for empty highways".to_string(),
            creator: "CyberSonic".to_string(),
            songs: (0..SONGS_PER_PLAYLIST).map(Song::slot).collect(),
            created_at: Utc::now(),
            theme: Theme::Ocean,
            rarity: Rarity::Epic,
            collects: 0,
            tx_hash: Some(TxHash("0xfeed".to_string())),
        };

        let raw = serde_json::to_string(&playlist).unwrap();
        // chrono serializes DateTime<Utc> in RFC 3339 / ISO-8601 form
        assert!(raw.contains("created_at"));
        let restored: Playlist = serde_json::from_str(&raw).unwrap();
        assert_eq!(restored, playlist);
        assert_eq!(restored.songs.len(), SONGS_PER_PLAYLIST);
    }
}
