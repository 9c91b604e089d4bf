//! Filesystem adapters for evidence storage.

mod evidence;

pub use evidence::FsEvidenceStore;
