mod form;
mod metadata;
mod stages;
mod status;

pub use form::{BulkAssignment, MintForm};
pub use metadata::{MetadataAttribute, MetadataRecord};
pub use stages::{MintError, MintPipeline, MintValidationError, MintedPlaylist, UploadedTracks, ValidatedForm};
pub use status::{StatusKind, StatusUpdate};
