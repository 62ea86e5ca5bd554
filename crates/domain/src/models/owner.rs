//! Ownership resolution for mutable resources.
//!
//! Every mutable entity (campaign, character, session log, party membership)
//! carries two generations of owner reference: `created_by` (user id, the
//! current scheme) and `owner_email` (the older scheme). Rows may have either
//! field populated alone, so both must be checked. Resolution order is id
//! match first, email match second, and a row with neither field recorded is
//! treated as publicly owned.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The acting identity, as supplied by authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
}

/// A resource's recorded owner fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRef {
    pub created_by: Option<Uuid>,
    pub owner_email: Option<String>,
}

impl OwnerRef {
    /// Builds an OwnerRef recording both fields for a newly created resource.
    pub fn of(identity: &Identity) -> Self {
        Self {
            created_by: Some(identity.user_id),
            owner_email: Some(identity.email.clone()),
        }
    }

    /// Builds an OwnerRef from raw row fields.
    pub fn from_fields(created_by: Option<Uuid>, owner_email: Option<String>) -> Self {
        Self {
            created_by,
            owner_email,
        }
    }

    /// Decides whether the acting identity may mutate the resource.
    ///
    /// Email comparison is exact and case-sensitive. Callers that get `false`
    /// must respond exactly as if the resource did not exist.
    pub fn authorizes(&self, identity: &Identity) -> bool {
        if let Some(id) = self.created_by {
            if id == identity.user_id {
                return true;
            }
        }
        if let Some(email) = &self.owner_email {
            if email == &identity.email {
                return true;
            }
        }
        // Legacy rows with no owner recorded are publicly owned
        self.created_by.is_none() && self.owner_email.is_none()
    }
}
