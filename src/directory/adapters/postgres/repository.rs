//! `PostgreSQL` directory adapter for reference-data reads.

use super::{
    models::{AssigneeRow, CustomerRow, DistrictRow, NoVisitReasonRow},
    schema::{assignees, customers, districts, no_visit_reasons},
};
use crate::directory::{
    domain::{
        AssigneeId, AssigneeRole, AssigneeSummary, CustomerGroupId, CustomerId, CustomerSummary,
        DistrictId, DistrictRef, NoVisitReasonId,
    },
    ports::{DirectoryLookup, DirectoryLookupError, DirectoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use std::collections::HashMap;

/// `PostgreSQL` connection pool type used by directory adapters.
pub type DirectoryPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed directory lookup.
#[derive(Debug, Clone)]
pub struct PostgresDirectory {
    pool: DirectoryPgPool,
}

impl PostgresDirectory {
    /// Creates a new directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: DirectoryPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> DirectoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> DirectoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(DirectoryLookupError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(DirectoryLookupError::persistence)?
    }
}

#[async_trait]
impl DirectoryLookup for PostgresDirectory {
    async fn customer_summaries(
        &self,
        ids: &[CustomerId],
    ) -> DirectoryResult<HashMap<CustomerId, CustomerSummary>> {
        let uuids: Vec<uuid::Uuid> = ids.iter().map(|id| id.into_inner()).collect();
        self.run_blocking(move |connection| {
            let rows: Vec<(CustomerRow, Option<DistrictRow>)> = customers::table
                .left_join(districts::table)
                .filter(customers::id.eq_any(uuids))
                .select((
                    CustomerRow::as_select(),
                    Option::<DistrictRow>::as_select(),
                ))
                .load(connection)
                .map_err(DirectoryLookupError::persistence)?;

            rows.into_iter()
                .map(|(customer, district)| {
                    let summary = row_to_customer(customer, district)?;
                    Ok((summary.id, summary))
                })
                .collect()
        })
        .await
    }

    async fn assignee_summaries(
        &self,
        ids: &[AssigneeId],
    ) -> DirectoryResult<HashMap<AssigneeId, AssigneeSummary>> {
        let uuids: Vec<uuid::Uuid> = ids.iter().map(|id| id.into_inner()).collect();
        self.run_blocking(move |connection| {
            let rows: Vec<AssigneeRow> = assignees::table
                .filter(assignees::id.eq_any(uuids))
                .select(AssigneeRow::as_select())
                .load(connection)
                .map_err(DirectoryLookupError::persistence)?;

            rows.into_iter()
                .map(|row| {
                    let summary = row_to_assignee(row)?;
                    Ok((summary.id, summary))
                })
                .collect()
        })
        .await
    }

    async fn no_visit_reason_labels(
        &self,
        ids: &[NoVisitReasonId],
    ) -> DirectoryResult<HashMap<NoVisitReasonId, String>> {
        let uuids: Vec<uuid::Uuid> = ids.iter().map(|id| id.into_inner()).collect();
        self.run_blocking(move |connection| {
            let rows: Vec<NoVisitReasonRow> = no_visit_reasons::table
                .filter(no_visit_reasons::id.eq_any(uuids))
                .select(NoVisitReasonRow::as_select())
                .load(connection)
                .map_err(DirectoryLookupError::persistence)?;

            Ok(rows
                .into_iter()
                .map(|row| (NoVisitReasonId::from_uuid(row.id), row.label))
                .collect())
        })
        .await
    }
}

fn row_to_customer(
    row: CustomerRow,
    district: Option<DistrictRow>,
) -> DirectoryResult<CustomerSummary> {
    let mut summary = CustomerSummary::new(CustomerId::from_uuid(row.id), row.display_name)
        .map_err(DirectoryLookupError::persistence)?;
    if let Some(district_row) = district {
        summary = summary.with_district(DistrictRef::new(
            DistrictId::from_uuid(district_row.id),
            district_row.display_name,
        ));
    }
    if let Some(group) = row.group_id {
        summary = summary.with_group(CustomerGroupId::from_uuid(group));
    }
    if !row.active {
        summary = summary.inactive();
    }
    Ok(summary)
}

fn row_to_assignee(row: AssigneeRow) -> DirectoryResult<AssigneeSummary> {
    let role =
        AssigneeRole::try_from(row.role.as_str()).map_err(DirectoryLookupError::persistence)?;
    AssigneeSummary::new(AssigneeId::from_uuid(row.id), row.display_name, role)
        .map_err(DirectoryLookupError::persistence)
}
