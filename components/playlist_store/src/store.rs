use crate::backend::StorageBackend;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use playlist_primitives::{AudioLocator, Playlist, PlaylistDraft, PlaylistId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

type Callback = Box<dyn Fn() + Send + Sync>;

struct Listener {
    id: u64,
    callback: Callback,
}

/// The set of locally known playlists, persisted through a storage
/// backend and observable through change subscriptions.
///
/// An explicit single-owner service instance: construct one, wrap it in
/// an `Arc`, and hand references to consumers. All mutation goes through
/// its methods; persistence and notification happen inline, not
/// deferred. Backend failures degrade the store to session-only
/// operation and are never surfaced to callers.
pub struct PlaylistStore {
    backend: Box<dyn StorageBackend + Send + Sync>,
    playlists: RwLock<Vec<Playlist>>,
    listeners: Mutex<Vec<Listener>>,
    next_listener_id: AtomicU64,
}

impl PlaylistStore {
    /// Build the store, loading any previously persisted playlists.
    ///
    /// Load failures are logged and leave the store empty; deserialized
    /// songs come back with their file handles empty, so transient
    /// locators from a previous session are present but no longer
    /// playable.
    pub fn new(backend: Box<dyn StorageBackend + Send + Sync>) -> Self {
        let playlists = match backend.load() {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Playlist>>(&raw) {
                Ok(list) => list,
                Err(e) => {
                    tracing::warn!(error = %e, "persisted playlists are unreadable, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load playlists from storage");
                Vec::new()
            }
        };

        Self {
            backend,
            playlists: RwLock::new(playlists),
            listeners: Mutex::new(Vec::new()),
            next_listener_id: AtomicU64::new(0),
        }
    }

    /// Insert a newly minted playlist at the front of the list.
    ///
    /// Assigns the id, creation timestamp, and zero collect count, and
    /// resolves each song's playable locator (an existing remote locator
    /// wins over generating a fresh transient one from the file handle).
    /// Returns the new id.
    pub fn add_playlist(&self, draft: PlaylistDraft) -> PlaylistId {
        let id = PlaylistId::generate();

        let songs = draft
            .songs
            .into_iter()
            .map(|mut song| {
                song.audio = AudioLocator::resolve(song.audio.take(), song.file.as_ref());
                song
            })
            .collect();

        let playlist = Playlist {
            id: id.clone(),
            title: draft.title,
            description: draft.description,
            creator: draft.creator,
            songs,
            created_at: Utc::now(),
            theme: draft.theme,
            rarity: draft.rarity,
            collects: 0,
            tx_hash: draft.tx_hash,
        };

        self.playlists.write().insert(0, playlist);
        tracing::info!(id = %id, "playlist added");

        self.persist();
        self.notify();
        id
    }

    /// Snapshot of all playlists, most recent first
    pub fn playlists(&self) -> Vec<Playlist> {
        self.playlists.read().clone()
    }

    /// Single playlist by id, if known
    pub fn playlist(&self, id: &PlaylistId) -> Option<Playlist> {
        self.playlists.read().iter().find(|p| &p.id == id).cloned()
    }

    /// Increase a playlist's collect counter by one.
    ///
    /// No-op when the id is unknown.
    pub fn increment_collects(&self, id: &PlaylistId) {
        let found = {
            let mut list = self.playlists.write();
            match list.iter_mut().find(|p| &p.id == id) {
                Some(playlist) => {
                    playlist.collects += 1;
                    true
                }
                None => false,
            }
        };

        if found {
            self.persist();
            self.notify();
        }
    }

    /// Register a change listener.
    ///
    /// The returned [`Subscription`] is the disposer: dropping it (or
    /// calling [`Subscription::unsubscribe`]) unregisters the listener,
    /// so a component that owns the guard cannot leak its callback past
    /// teardown.
    pub fn subscribe(
        self: &Arc<Self>,
        callback: impl Fn() + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push(Listener {
            id,
            callback: Box::new(callback),
        });
        Subscription {
            store: Arc::downgrade(self),
            id,
        }
    }

    /// Serialize and write the current list. File handles are stripped
    /// by the serialization contract; failures are logged and the store
    /// keeps serving from memory for the rest of the session.
    fn persist(&self) {
        let payload = {
            let list = self.playlists.read();
            match serde_json::to_string(&*list) {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to serialize playlists");
                    return;
                }
            }
        };

        if let Err(e) = self.backend.save(&payload) {
            tracing::warn!(error = %e, "failed to persist playlists, continuing in memory");
        }
    }

    fn notify(&self) {
        let listeners = self.listeners.lock();
        for listener in listeners.iter() {
            (listener.callback)();
        }
    }
}

/// Scoped handle to a registered change listener
#[must_use = "dropping the subscription immediately unregisters the listener"]
pub struct Subscription {
    store: Weak<PlaylistStore>,
    id: u64,
}

impl Subscription {
    /// Explicitly unregister the listener (equivalent to dropping)
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store.listeners.lock().retain(|l| l.id != self.id);
        }
    }
}
