//! Read models for reference-data enrichment.
//!
//! Summaries carry the display fields reports need (names, district, group
//! membership) without pulling the full customer or assignee records into
//! the core.

use serde::{Deserialize, Serialize};

use super::{
    AssigneeId, AssigneeRole, CustomerGroupId, CustomerId, DirectoryDomainError, DistrictId,
};

/// District name pair attached to a customer summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictRef {
    /// District identifier.
    pub id: DistrictId,
    /// District display name.
    pub name: String,
}

impl DistrictRef {
    /// Creates a district reference.
    #[must_use]
    pub fn new(id: DistrictId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Customer display data used for plan enrichment and filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSummary {
    /// Customer identifier.
    pub id: CustomerId,
    /// Customer display name.
    pub name: String,
    /// District the customer belongs to, if assigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<DistrictRef>,
    /// Reporting group the customer belongs to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<CustomerGroupId>,
    /// Whether the customer is currently active.
    ///
    /// Inactive customers are still reported; filtering them out is the
    /// caller's responsibility, not the reconciliation engine's.
    pub active: bool,
}

impl CustomerSummary {
    /// Creates an active customer summary.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyDisplayName`] when the name is
    /// empty after trimming.
    pub fn new(id: CustomerId, name: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let name = validated_name(name)?;
        Ok(Self {
            id,
            name,
            district: None,
            group: None,
            active: true,
        })
    }

    /// Creates a placeholder summary for an identifier the directory does
    /// not know, rendering the raw id as the display name.
    #[must_use]
    pub fn unlisted(id: CustomerId) -> Self {
        Self {
            id,
            name: id.to_string(),
            district: None,
            group: None,
            active: true,
        }
    }

    /// Attaches the customer's district.
    #[must_use]
    pub fn with_district(mut self, district: DistrictRef) -> Self {
        self.district = Some(district);
        self
    }

    /// Attaches the customer's reporting group.
    #[must_use]
    pub const fn with_group(mut self, group: CustomerGroupId) -> Self {
        self.group = Some(group);
        self
    }

    /// Marks the customer as inactive.
    #[must_use]
    pub const fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Returns the district name, if the customer has one.
    #[must_use]
    pub fn district_name(&self) -> Option<&str> {
        self.district.as_ref().map(|d| d.name.as_str())
    }
}

/// Assignee display data used for plan enrichment and report sorting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssigneeSummary {
    /// Assignee identifier.
    pub id: AssigneeId,
    /// Assignee display name.
    pub name: String,
    /// Assignee role kind.
    pub role: AssigneeRole,
}

impl AssigneeSummary {
    /// Creates an assignee summary.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyDisplayName`] when the name is
    /// empty after trimming.
    pub fn new(
        id: AssigneeId,
        name: impl Into<String>,
        role: AssigneeRole,
    ) -> Result<Self, DirectoryDomainError> {
        let name = validated_name(name)?;
        Ok(Self { id, name, role })
    }

    /// Creates a placeholder summary for an identifier the directory does
    /// not know.
    ///
    /// Unknown assignees default to the seller role; the role is display
    /// data here and never drives behaviour.
    #[must_use]
    pub fn unlisted(id: AssigneeId) -> Self {
        Self {
            id,
            name: id.to_string(),
            role: AssigneeRole::Seller,
        }
    }
}

fn validated_name(name: impl Into<String>) -> Result<String, DirectoryDomainError> {
    let raw = name.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DirectoryDomainError::EmptyDisplayName);
    }
    Ok(trimmed.to_owned())
}
