//! Port contracts for visit capture.
//!
//! Ports define infrastructure-agnostic interfaces used by visit services.

pub mod evidence;
pub mod repository;

#[cfg(test)]
pub use evidence::MockEvidenceStore;
pub use evidence::{EvidenceStore, EvidenceStoreError, EvidenceStoreResult, ObjectKey};
pub use repository::{
    VisitRecordRepository, VisitRepositoryError, VisitRepositoryResult, WindowQuery,
};
