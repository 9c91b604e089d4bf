//! Application services for route plan reconciliation.

mod reconcile;

pub use reconcile::{ReconcileConfig, ReconcileError, RouteReconciliationService};
