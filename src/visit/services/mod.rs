//! Application services for visit capture orchestration.

mod evidence;
mod session;

pub use evidence::{
    EvidenceFailurePolicy, EvidenceUploadFailure, EvidenceUploadSaga, PendingPhoto, UploadedPhoto,
};
pub use session::{
    SaveVisitError, SessionConfig, SessionError, SessionStart, VisitDraft, VisitSessionService,
};
