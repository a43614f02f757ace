//! Child links and lineage kinds

use serde::{Deserialize, Serialize};

use crate::person::PersonId;
use crate::union::UnionId;

/// Classification of a parent-child link.
///
/// A person has at most one `Biological` link across all unions; the
/// other kinds may repeat freely (step and adoptive families).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lineage {
    Biological,
    Adopted,
    Step,
    Foster,
}

impl Lineage {
    pub fn is_biological(&self) -> bool {
        matches!(self, Lineage::Biological)
    }
}

/// Associates a person, as a child, with a parental union
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChildLink {
    pub union_id: UnionId,
    pub person_id: PersonId,
    pub lineage: Lineage,

    /// Sibling display order within the union, when assigned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_order: Option<u32>,
}

impl ChildLink {
    pub fn new(union_id: UnionId, person_id: PersonId, lineage: Lineage) -> Self {
        Self {
            union_id,
            person_id,
            lineage,
            birth_order: None,
        }
    }

    pub fn with_birth_order(mut self, order: u32) -> Self {
        self.birth_order = Some(order);
        self
    }

    /// Sort key for rendering a union's children: lineage first
    /// (biological before the rest), then birth order (unassigned
    /// last), then id for stability.
    pub fn ordering_key(&self) -> (Lineage, u32, PersonId) {
        (
            self.lineage,
            self.birth_order.unwrap_or(u32::MAX),
            self.person_id,
        )
    }
}

/// Data for attaching a child to a union
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChild {
    pub person_id: PersonId,
    pub lineage: Lineage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_order: Option<u32>,
}

impl NewChild {
    pub fn new(person_id: PersonId, lineage: Lineage) -> Self {
        Self {
            person_id,
            lineage,
            birth_order: None,
        }
    }

    pub fn with_birth_order(mut self, order: u32) -> Self {
        self.birth_order = Some(order);
        self
    }
}
