use playlist_primitives::{AudioFile, Song, SONGS_PER_PLAYLIST};

/// Result of assigning a batch of files to the song slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAssignment {
    /// More files than slots; the surplus was dropped
    Truncated { assigned: usize, dropped: usize },
    /// Fewer files than slots; the rest stay editable
    Partial { assigned: usize, remaining: usize },
    /// Exactly one file per slot
    Complete,
}

/// Editable creation form: playlist details plus the fixed 12 song
/// slots. Purely in-memory; nothing here touches the network.
#[derive(Debug, Clone)]
pub struct MintForm {
    pub title: String,
    pub description: String,
    pub creator: String,
    songs: Vec<Song>,
}

impl Default for MintForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MintForm {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            creator: String::new(),
            songs: (0..SONGS_PER_PLAYLIST).map(Song::slot).collect(),
        }
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn set_song_title(&mut self, index: usize, title: impl Into<String>) {
        if let Some(song) = self.songs.get_mut(index) {
            song.title = title.into();
        }
    }

    pub fn set_song_file(&mut self, index: usize, file: AudioFile) {
        if let Some(song) = self.songs.get_mut(index) {
            song.file = Some(file);
        }
    }

    /// Reset a slot to empty, keeping its stable id
    pub fn clear_song(&mut self, index: usize) {
        if let Some(song) = self.songs.get_mut(index) {
            song.title.clear();
            song.file = None;
        }
    }

    pub fn clear_all_songs(&mut self) {
        for index in 0..self.songs.len() {
            self.clear_song(index);
        }
    }

    /// Assign a batch of files to the slots in order, starting at the
    /// first. Files beyond the twelfth are dropped. A slot without a
    /// title gets one derived from the file name (extension stripped);
    /// an existing title is kept.
    pub fn bulk_assign(&mut self, files: Vec<AudioFile>) -> BulkAssignment {
        let total = files.len();
        let assigned = total.min(SONGS_PER_PLAYLIST);

        for (slot, file) in self.songs.iter_mut().zip(files.into_iter()) {
            if slot.title.trim().is_empty() {
                slot.title = file.title_hint();
            }
            slot.file = Some(file);
        }

        if total > SONGS_PER_PLAYLIST {
            BulkAssignment::Truncated {
                assigned,
                dropped: total - SONGS_PER_PLAYLIST,
            }
        } else if total < SONGS_PER_PLAYLIST {
            BulkAssignment::Partial {
                assigned,
                remaining: SONGS_PER_PLAYLIST - assigned,
            }
        } else {
            BulkAssignment::Complete
        }
    }

    /// Number of slots with both a title and a file
    pub fn completed_count(&self) -> usize {
        self.songs.iter().filter(|s| s.is_complete()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> AudioFile {
        AudioFile::new(name, format!("/tmp/{name}"))
    }

    fn files(count: usize) -> Vec<AudioFile> {
        (0..count).map(|i| file(&format!("track-{i}.mp3"))).collect()
    }

    #[test]
    fn new_form_has_twelve_empty_slots() {
        let form = MintForm::new();
        assert_eq!(form.songs().len(), SONGS_PER_PLAYLIST);
        assert_eq!(form.completed_count(), 0);
        assert_eq!(form.songs()[4].id.as_str(), "song-4");
    }

    #[test]
    fn bulk_assign_exactly_twelve() {
        let mut form = MintForm::new();
        assert_eq!(form.bulk_assign(files(12)), BulkAssignment::Complete);
        assert_eq!(form.completed_count(), 12);
        // Titles derived from file names, extension stripped
        assert_eq!(form.songs()[0].title, "track-0");
    }

    #[test]
    fn bulk_assign_truncates_beyond_twelve() {
        let mut form = MintForm::new();
        assert_eq!(
            form.bulk_assign(files(15)),
            BulkAssignment::Truncated {
                assigned: 12,
                dropped: 3
            }
        );
        assert_eq!(form.completed_count(), 12);
    }

    #[test]
    fn bulk_assign_reports_remaining_slots() {
        let mut form = MintForm::new();
        assert_eq!(
            form.bulk_assign(files(5)),
            BulkAssignment::Partial {
                assigned: 5,
                remaining: 7
            }
        );
        assert_eq!(form.completed_count(), 5);
    }

    #[test]
    fn bulk_assign_keeps_existing_titles() {
        let mut form = MintForm::new();
        form.set_song_title(0, "My Own Name");
        form.bulk_assign(files(2));
        assert_eq!(form.songs()[0].title, "My Own Name");
        assert_eq!(form.songs()[1].title, "track-1");
    }

    #[test]
    fn clearing_a_slot_keeps_its_id() {
        let mut form = MintForm::new();
        form.set_song_title(3, "Gone Soon");
        form.set_song_file(3, file("gone.mp3"));
        assert_eq!(form.completed_count(), 1);

        form.clear_song(3);
        assert_eq!(form.completed_count(), 0);
        assert_eq!(form.songs()[3].id.as_str(), "song-3");
        assert!(form.songs()[3].title.is_empty());
    }

    #[test]
    fn clear_all_resets_every_slot() {
        let mut form = MintForm::new();
        form.bulk_assign(files(12));
        form.clear_all_songs();
        assert_eq!(form.completed_count(), 0);
    }

    #[test]
    fn out_of_range_edits_are_ignored() {
        let mut form = MintForm::new();
        form.set_song_title(40, "nope");
        form.clear_song(40);
        assert_eq!(form.completed_count(), 0);
    }
}
