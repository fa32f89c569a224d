mod ids;
mod playlist;
mod song;
mod tags;

pub use ids::{PlaylistId, SongId, TxHash};
pub use playlist::{Playlist, PlaylistDraft, SONGS_PER_PLAYLIST};
pub use song::{AudioFile, AudioLocator, LocatorError, Song, StorageUri};
pub use tags::{Rarity, Theme};
