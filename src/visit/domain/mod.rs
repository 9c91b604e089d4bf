//! Domain model for visit capture.
//!
//! The visit domain models the stored visit record, its outcome and evidence
//! photos, the whole-minute duration scalar, and the in-progress session
//! state, while keeping all infrastructure concerns outside of the domain
//! boundary.

mod duration;
mod error;
mod ids;
mod record;
mod session;

pub use duration::DurationMinutes;
pub use error::VisitDomainError;
pub use ids::VisitId;
pub use record::{
    EvidencePhotos, NewVisitData, PersistedVisitData, PhotoStage, VisitOutcome, VisitRecord,
};
pub use session::{ActiveVisit, ActiveVisitSnapshot, VisitCompletion};
