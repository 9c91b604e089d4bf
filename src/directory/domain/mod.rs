//! Domain model for reference data shared by the visit and route contexts.
//!
//! The directory owns the identifier scalars and the read models used to
//! enrich plans and reports with display names, while keeping all lookup
//! infrastructure outside of the domain boundary.

mod error;
mod ids;
mod role;
mod summary;

pub use error::DirectoryDomainError;
pub use ids::{
    AssigneeId, CustomerGroupId, CustomerId, DistrictId, NoVisitReasonId, UserId, VisitTypeId,
};
pub use role::{AssigneeRole, ParseAssigneeRoleError};
pub use summary::{AssigneeSummary, CustomerSummary, DistrictRef};
