//! Service layer joining the planned route against logged visits.
//!
//! The service loads assignments and visit records through their ports,
//! delegates the join itself to the pure functions in
//! [`crate::route::domain`], and enriches the resulting rows with display
//! data from the directory.

use crate::directory::domain::{
    AssigneeId, AssigneeSummary, CustomerId, CustomerSummary, NoVisitReasonId,
};
use crate::directory::ports::{DirectoryLookup, DirectoryLookupError};
use crate::route::{
    domain::{
        classify, expand_window, index_daily_visits, sort_stops, PageRequest, PlanWindow,
        PlannedStop, ReconciledStop, RouteAssignment, RouteDomainError, StatusFilter, StopFilters,
        StopPage,
    },
    ports::{AssignmentQuery, RouteAssignmentRepository, RouteRepositoryError},
};
use crate::visit::{
    domain::VisitRecord,
    ports::{VisitRecordRepository, VisitRepositoryError, WindowQuery},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

/// Policy knobs for the reconciliation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileConfig {
    /// Largest window span, in days, a single report may expand.
    pub max_window_days: i64,
}

impl ReconcileConfig {
    /// Default horizon: one leap year of day-by-day expansion.
    pub const DEFAULT_MAX_WINDOW_DAYS: i64 = 366;

    /// Creates the default config.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_window_days: Self::DEFAULT_MAX_WINDOW_DAYS,
        }
    }

    /// Overrides the window horizon.
    #[must_use]
    pub const fn with_max_window_days(mut self, days: i64) -> Self {
        self.max_window_days = days;
        self
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors returned by the reconciliation service.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Window validation failed.
    #[error(transparent)]
    Domain(#[from] RouteDomainError),

    /// Assignment repository failure.
    #[error(transparent)]
    Assignments(#[from] RouteRepositoryError),

    /// Visit repository failure.
    #[error(transparent)]
    Visits(#[from] VisitRepositoryError),

    /// Directory lookup failure.
    #[error(transparent)]
    Directory(#[from] DirectoryLookupError),
}

/// Display summaries resolved for one reconciliation run.
///
/// The maps are pre-populated with placeholder summaries for every id the
/// directory did not return, so row assembly never drops a stop.
struct DisplayData {
    customers: HashMap<CustomerId, CustomerSummary>,
    assignees: HashMap<AssigneeId, AssigneeSummary>,
}

impl DisplayData {
    fn customer(&self, id: CustomerId) -> CustomerSummary {
        self.customers
            .get(&id)
            .cloned()
            .unwrap_or_else(|| CustomerSummary::unlisted(id))
    }

    fn assignee(&self, id: AssigneeId) -> AssigneeSummary {
        self.assignees
            .get(&id)
            .cloned()
            .unwrap_or_else(|| AssigneeSummary::unlisted(id))
    }
}

/// Plan-versus-actual reconciliation service.
///
/// Expands weekly route assignments over a calendar window, left-joins the
/// logged visit records on the `(assignee, customer, date)` slot, and
/// returns filtered, sorted, paginated report rows.
pub struct RouteReconciliationService<A, V, D, C>
where
    A: RouteAssignmentRepository,
    V: VisitRecordRepository,
    D: DirectoryLookup,
    C: Clock + Send + Sync,
{
    config: ReconcileConfig,
    assignments: Arc<A>,
    visits: Arc<V>,
    directory: Arc<D>,
    clock: Arc<C>,
}

impl<A, V, D, C> RouteReconciliationService<A, V, D, C>
where
    A: RouteAssignmentRepository,
    V: VisitRecordRepository,
    D: DirectoryLookup,
    C: Clock + Send + Sync,
{
    /// Creates a reconciliation service over the given ports.
    #[must_use]
    pub const fn new(
        config: ReconcileConfig,
        assignments: Arc<A>,
        visits: Arc<V>,
        directory: Arc<D>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            config,
            assignments,
            visits,
            directory,
            clock,
        }
    }

    /// Reconciles the planned route over the window into report rows.
    ///
    /// An empty window (start after end) yields the empty page rather than
    /// an error. `total` counts the full post-status-filter row set even
    /// when pagination trims the returned rows.
    ///
    /// # Errors
    ///
    /// Returns [`RouteDomainError::WindowTooLarge`] (wrapped in
    /// [`ReconcileError::Domain`]) when the window exceeds the configured
    /// horizon, or the failing port's error when a load fails.
    pub async fn reconcile(
        &self,
        window: PlanWindow,
        filters: StopFilters,
        page: Option<PageRequest>,
    ) -> Result<StopPage, ReconcileError> {
        window.check_horizon(self.config.max_window_days)?;
        if window.is_empty() {
            return Ok(StopPage::empty());
        }

        let assignments = self.load_assignments(&filters).await?;
        if assignments.is_empty() {
            return Ok(StopPage::empty());
        }

        let planned = expand_window(&assignments, &window);
        let display = self.resolve_display(&planned).await?;
        let visible = retain_matching_customers(planned, &filters, &display);
        if visible.is_empty() {
            return Ok(StopPage::empty());
        }

        let rows = self.join_actuals(window, &filters, visible, &display).await?;
        Ok(assemble_page(rows, filters.status(), page))
    }

    /// Returns the single-day plan for one assignee, in report order.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError`] when a port load fails.
    pub async fn daily_plan(
        &self,
        assignee_id: AssigneeId,
        date: NaiveDate,
    ) -> Result<Vec<ReconciledStop>, ReconcileError> {
        let filters = StopFilters::new().with_assignee(assignee_id);
        let page = self
            .reconcile(PlanWindow::single(date), filters, None)
            .await?;
        Ok(page.stops)
    }

    /// Returns today's plan for one assignee, using the injected clock's
    /// current UTC date.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError`] when a port load fails.
    pub async fn today_plan(
        &self,
        assignee_id: AssigneeId,
    ) -> Result<Vec<ReconciledStop>, ReconcileError> {
        let today = self.clock.utc().date_naive();
        self.daily_plan(assignee_id, today).await
    }

    async fn load_assignments(
        &self,
        filters: &StopFilters,
    ) -> Result<Vec<RouteAssignment>, ReconcileError> {
        let mut query = AssignmentQuery::new();
        if let Some(assignee) = filters.assignee() {
            query = query.with_assignee(assignee);
        }
        if let Some(customer) = filters.customer() {
            query = query.with_customer(customer);
        }
        Ok(self.assignments.list(query).await?)
    }

    async fn resolve_display(
        &self,
        planned: &[PlannedStop],
    ) -> Result<DisplayData, ReconcileError> {
        let customer_ids = unique_customer_ids(planned);
        let assignee_ids = unique_assignee_ids(planned);

        let mut customers = self.directory.customer_summaries(&customer_ids).await?;
        for id in &customer_ids {
            if !customers.contains_key(id) {
                tracing::warn!(
                    customer_id = %id,
                    "customer missing from directory, rendering raw id"
                );
                customers.insert(*id, CustomerSummary::unlisted(*id));
            }
        }

        let mut assignees = self.directory.assignee_summaries(&assignee_ids).await?;
        for id in &assignee_ids {
            if !assignees.contains_key(id) {
                tracing::warn!(
                    assignee_id = %id,
                    "assignee missing from directory, rendering raw id"
                );
                assignees.insert(*id, AssigneeSummary::unlisted(*id));
            }
        }

        Ok(DisplayData {
            customers,
            assignees,
        })
    }

    async fn join_actuals(
        &self,
        window: PlanWindow,
        filters: &StopFilters,
        planned: Vec<PlannedStop>,
        display: &DisplayData,
    ) -> Result<Vec<ReconciledStop>, ReconcileError> {
        let records = self.visits.find_in_window(visit_query(window, filters)).await?;
        let reason_labels = self.resolve_reason_labels(&records).await?;
        let index = index_daily_visits(records);

        let mut rows = Vec::with_capacity(planned.len());
        for stop in planned {
            let matched = index.get(&stop.slot());
            let reason_label = matched
                .and_then(|record| record.outcome().no_visit_reason())
                .and_then(|reason| reason_labels.get(&reason).cloned());
            rows.push(ReconciledStop {
                plan_date: stop.plan_date,
                assignee: display.assignee(stop.assignee_id),
                customer: display.customer(stop.customer_id),
                outcome: classify(matched, reason_label),
            });
        }
        Ok(rows)
    }

    async fn resolve_reason_labels(
        &self,
        records: &[VisitRecord],
    ) -> Result<HashMap<NoVisitReasonId, String>, ReconcileError> {
        let ids: Vec<NoVisitReasonId> = records
            .iter()
            .filter_map(|record| record.outcome().no_visit_reason())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let labels = self.directory.no_visit_reason_labels(&ids).await?;
        for id in &ids {
            if !labels.contains_key(id) {
                tracing::warn!(
                    reason_id = %id,
                    "no-visit reason missing from directory, rendering raw id"
                );
            }
        }
        Ok(labels)
    }
}

fn unique_customer_ids(planned: &[PlannedStop]) -> Vec<CustomerId> {
    let mut ids: Vec<CustomerId> = planned.iter().map(|stop| stop.customer_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn unique_assignee_ids(planned: &[PlannedStop]) -> Vec<AssigneeId> {
    let mut ids: Vec<AssigneeId> = planned.iter().map(|stop| stop.assignee_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn retain_matching_customers(
    planned: Vec<PlannedStop>,
    filters: &StopFilters,
    display: &DisplayData,
) -> Vec<PlannedStop> {
    planned
        .into_iter()
        .filter(|stop| {
            display
                .customers
                .get(&stop.customer_id)
                .is_none_or(|customer| filters.matches_customer(customer))
        })
        .collect()
}

fn visit_query(window: PlanWindow, filters: &StopFilters) -> WindowQuery {
    let mut query = WindowQuery::new(window.start(), window.end());
    if let Some(assignee) = filters.assignee() {
        query = query.with_assignee(assignee);
    }
    if let Some(customer) = filters.customer() {
        query = query.with_customer(customer);
    }
    query
}

fn assemble_page(
    rows: Vec<ReconciledStop>,
    status: StatusFilter,
    page: Option<PageRequest>,
) -> StopPage {
    let mut report = Vec::with_capacity(rows.len());
    let mut total: u64 = 0;
    for row in rows {
        if status.matches(row.status()) {
            total += 1;
            report.push(row);
        }
    }
    sort_stops(&mut report);

    if let Some(request) = page {
        report = report
            .into_iter()
            .skip(request.offset())
            .take(request.limit())
            .collect();
    }
    StopPage {
        stops: report,
        total,
    }
}
