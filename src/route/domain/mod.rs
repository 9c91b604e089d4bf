//! Domain model for route planning and reconciliation.
//!
//! The route domain models the weekly assignment aggregate, the plan
//! window, and the pure reconciliation steps that join planned stops with
//! logged visits, while keeping all infrastructure concerns outside of the
//! domain boundary.

mod assignment;
mod error;
mod ids;
mod reconcile;
mod stop;
mod window;

pub use assignment::{NewAssignmentData, PersistedAssignmentData, RouteAssignment, ScheduledDay};
pub use error::RouteDomainError;
pub use ids::AssignmentId;
pub use reconcile::{
    DailySlot, PlannedStop, classify, expand_window, index_daily_visits, sort_stops,
};
pub use stop::{
    PageRequest, ParseStatusFilterError, ReconciledStop, StatusFilter, StopFilters, StopOutcome,
    StopPage, StopStatus,
};
pub use window::PlanWindow;
