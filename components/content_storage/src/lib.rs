mod config;
mod probe;
mod upload;

pub use config::StorageConfig;
pub use probe::{probe, Reachability};
pub use upload::{uploader_for, MockUploader, PinningUploader, StorageServiceError, TrackUploader};
