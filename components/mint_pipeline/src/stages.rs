use crate::form::MintForm;
use crate::metadata::MetadataRecord;
use crate::status::StatusUpdate;
use content_storage::{StorageServiceError, TrackUploader};
use futures::future::try_join_all;
use playlist_primitives::{
    AudioFile, AudioLocator, PlaylistDraft, PlaylistId, Rarity, Song, Theme, TxHash,
    SONGS_PER_PLAYLIST,
};
use playlist_store::PlaylistStore;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use wallet_session::{SongEntry, WalletError, WalletSession};

/// Fast-fail conditions checked before any network interaction, in
/// order: playlist details, song completeness, wallet connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MintValidationError {
    #[error("please fill in playlist title, description, and creator name")]
    MissingDetails,

    #[error("all 12 songs must have both a title and an audio file")]
    IncompleteSongs,

    #[error("please connect your wallet first")]
    WalletNotConnected,
}

#[derive(Debug, Error)]
pub enum MintError {
    #[error(transparent)]
    Validation(#[from] MintValidationError),

    #[error("storage upload failed: {0}")]
    Storage(#[from] StorageServiceError),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error("failed to encode metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

struct SourcedTrack {
    song: Song,
    file: AudioFile,
}

/// A form that passed validation: details present, all twelve slots
/// complete. Can only be produced by [`MintForm::validate`].
pub struct ValidatedForm {
    title: String,
    description: String,
    creator: String,
    tracks: Vec<SourcedTrack>,
}

impl MintForm {
    pub fn validate(&self) -> Result<ValidatedForm, MintValidationError> {
        if self.title.trim().is_empty()
            || self.description.trim().is_empty()
            || self.creator.trim().is_empty()
        {
            return Err(MintValidationError::MissingDetails);
        }

        if self.songs().len() != SONGS_PER_PLAYLIST
            || self.songs().iter().any(|song| !song.is_complete())
        {
            return Err(MintValidationError::IncompleteSongs);
        }

        let tracks = self
            .songs()
            .iter()
            .filter_map(|song| {
                song.file.clone().map(|file| SourcedTrack {
                    song: song.clone(),
                    file,
                })
            })
            .collect();

        Ok(ValidatedForm {
            title: self.title.clone(),
            description: self.description.clone(),
            creator: self.creator.clone(),
            tracks,
        })
    }
}

/// Tracks resolved to content locators. Can only be produced by
/// [`ValidatedForm::upload`].
pub struct UploadedTracks {
    title: String,
    description: String,
    creator: String,
    songs: Vec<Song>,
    entries: Vec<SongEntry>,
}

impl ValidatedForm {
    /// Resolve every file to a content-addressed reference, uploading
    /// concurrently. Any single failure aborts the whole stage.
    pub async fn upload(
        self,
        uploader: &Arc<dyn TrackUploader>,
    ) -> Result<UploadedTracks, StorageServiceError> {
        let uploads = self.tracks.into_iter().map(|track| {
            let uploader = Arc::clone(uploader);
            async move {
                let uri = uploader.upload(&track.file).await?;
                let mut song = track.song;
                song.storage_uri = Some(uri.clone());
                // A durable gateway locator exists only for genuinely
                // pinned content; otherwise the store derives a
                // transient locator from the file when recording.
                if let Some(url) = uploader.playback_url(&uri) {
                    song.audio = Some(AudioLocator::Remote(url));
                }
                let entry = SongEntry {
                    title: song.title.clone(),
                    storage_uri: uri,
                };
                Ok::<(Song, SongEntry), StorageServiceError>((song, entry))
            }
        });

        let resolved = try_join_all(uploads).await?;
        let (songs, entries) = resolved.into_iter().unzip();

        Ok(UploadedTracks {
            title: self.title,
            description: self.description,
            creator: self.creator,
            songs,
            entries,
        })
    }
}

/// A confirmed mint, ready to be recorded locally. Can only be
/// produced by [`UploadedTracks::mint`].
pub struct MintedPlaylist {
    title: String,
    description: String,
    creator: String,
    songs: Vec<Song>,
    tx_hash: TxHash,
}

impl UploadedTracks {
    /// Encode the metadata record as a self-contained locator and
    /// submit the mint through the wallet session.
    pub async fn mint(self, session: &WalletSession) -> Result<MintedPlaylist, MintError> {
        let metadata = MetadataRecord::new(
            self.title.as_str(),
            self.description.as_str(),
            self.creator.as_str(),
            session.chain().name.as_str(),
            self.entries.clone(),
        );
        let metadata_uri = metadata.to_data_uri()?;

        let tx_hash = session.mint_playlist_nft(self.entries, &metadata_uri).await?;

        Ok(MintedPlaylist {
            title: self.title,
            description: self.description,
            creator: self.creator,
            songs: self.songs,
            tx_hash,
        })
    }
}

impl MintedPlaylist {
    pub fn tx_hash(&self) -> &TxHash {
        &self.tx_hash
    }

    /// Write the playlist into the local store with randomly chosen
    /// cosmetic tags and the transaction reference.
    pub fn record(self, store: &PlaylistStore) -> PlaylistId {
        let mut rng = rand::thread_rng();
        store.add_playlist(PlaylistDraft {
            title: self.title,
            description: self.description,
            creator: self.creator,
            songs: self.songs,
            theme: Theme::random(&mut rng),
            rarity: Rarity::random(&mut rng),
            tx_hash: Some(self.tx_hash),
        })
    }
}

/// End-to-end creation flow: validation, upload, mint, local record.
///
/// Emits user-facing status lines over a broadcast channel while it
/// runs; every failure resolves back to a stable state.
pub struct MintPipeline {
    session: Arc<WalletSession>,
    uploader: Arc<dyn TrackUploader>,
    store: Arc<PlaylistStore>,
    status_tx: broadcast::Sender<StatusUpdate>,
}

impl MintPipeline {
    pub fn new(
        session: Arc<WalletSession>,
        uploader: Arc<dyn TrackUploader>,
        store: Arc<PlaylistStore>,
    ) -> Self {
        let (status_tx, _) = broadcast::channel(16);
        Self {
            session,
            uploader,
            store,
            status_tx,
        }
    }

    pub fn subscribe_status(&self) -> broadcast::Receiver<StatusUpdate> {
        self.status_tx.subscribe()
    }

    pub async fn run(&self, form: &MintForm) -> Result<PlaylistId, MintError> {
        let validated = match form.validate() {
            Ok(validated) => validated,
            Err(e) => {
                self.emit(StatusUpdate::error(e.to_string()));
                return Err(e.into());
            }
        };

        if !self.session.status().connected {
            let e = MintValidationError::WalletNotConnected;
            self.emit(StatusUpdate::error(e.to_string()));
            return Err(e.into());
        }

        self.emit(StatusUpdate::info("uploading audio files to storage..."));
        let uploaded = match validated.upload(&self.uploader).await {
            Ok(uploaded) => uploaded,
            Err(e) => {
                self.emit(StatusUpdate::error(format!("upload failed: {e}")));
                return Err(e.into());
            }
        };

        self.emit(StatusUpdate::info(format!(
            "minting your playlist NFT on {}...",
            self.session.chain().name
        )));
        let minted = match uploaded.mint(&self.session).await {
            Ok(minted) => minted,
            Err(e) => {
                self.emit(StatusUpdate::error(e.to_string()));
                return Err(e);
            }
        };

        let tx_short = minted.tx_hash().short();
        let id = minted.record(&self.store);
        self.emit(StatusUpdate::success(format!(
            "playlist NFT minted; transaction {tx_short}"
        )));
        Ok(id)
    }

    fn emit(&self, update: StatusUpdate) {
        tracing::info!(message = %update.message, "mint status");
        // Nobody listening is fine
        let _ = self.status_tx.send(update);
    }
}
