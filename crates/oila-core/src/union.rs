//! Union (marriage/partnership) types and partner links

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::lineage::ChildLink;
use crate::person::PersonId;

/// Unique identifier for a union
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnionId(pub Ulid);

impl UnionId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    pub fn from_string(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for UnionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UnionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a union is ongoing or has ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnionStatus {
    #[default]
    Active,
    Dissolved,
}

/// Formal or informal character of a union
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnionKind {
    #[default]
    Marriage,
    Partnership,
}

/// Partner ordering slot within a union.
///
/// Imposes a deterministic display order only; it carries no lifecycle
/// of its own beyond the union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartnerSlot {
    First,
    Second,
}

/// A marriage or partnership linking up to two partners and any number
/// of children.
///
/// A union with exactly one partner is a valid single-parent
/// placeholder awaiting a second partner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Union {
    /// Unique identifier
    pub id: UnionId,

    /// Marriage or informal partnership
    pub kind: UnionKind,

    /// Active or dissolved
    pub status: UnionStatus,

    /// Date the union started, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_on: Option<NaiveDate>,

    /// Date the union ended (dissolved unions only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_on: Option<NaiveDate>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Union {
    /// Create a new active union
    pub fn new(kind: UnionKind) -> Self {
        let now = Utc::now();
        Self {
            id: UnionId::new(),
            kind,
            status: UnionStatus::Active,
            started_on: None,
            ended_on: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the start date
    pub fn with_started_on(mut self, date: NaiveDate) -> Self {
        self.started_on = Some(date);
        self
    }

    /// Mark the union dissolved, recording the end date when given
    pub fn dissolve(&mut self, ended_on: Option<NaiveDate>) {
        self.status = UnionStatus::Dissolved;
        self.ended_on = ended_on;
        self.touch();
    }

    pub fn is_active(&self) -> bool {
        self.status == UnionStatus::Active
    }

    /// Bump the update timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Associates a person with a union as one of its (at most two) partners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartnerLink {
    pub union_id: UnionId,
    pub person_id: PersonId,
    pub slot: PartnerSlot,
}

impl PartnerLink {
    pub fn new(union_id: UnionId, person_id: PersonId, slot: PartnerSlot) -> Self {
        Self {
            union_id,
            person_id,
            slot,
        }
    }
}

/// A union rendered with its relations eagerly populated: slot-ordered
/// partners and lineage-and-birth-order-sorted children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionView {
    pub union: Union,
    pub partners: Vec<PartnerLink>,
    pub children: Vec<ChildLink>,
}

/// Data for creating a new union
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUnion {
    pub first_partner: PersonId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_partner: Option<PersonId>,
    #[serde(default)]
    pub kind: UnionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_on: Option<NaiveDate>,
}

impl NewUnion {
    pub fn new(first_partner: PersonId) -> Self {
        Self {
            first_partner,
            second_partner: None,
            kind: UnionKind::default(),
            started_on: None,
        }
    }

    pub fn with_partner(mut self, second_partner: PersonId) -> Self {
        self.second_partner = Some(second_partner);
        self
    }

    pub fn with_kind(mut self, kind: UnionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_started_on(mut self, date: NaiveDate) -> Self {
        self.started_on = Some(date);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_creation() {
        let union = Union::new(UnionKind::Marriage);

        assert_eq!(union.kind, UnionKind::Marriage);
        assert_eq!(union.status, UnionStatus::Active);
        assert!(union.is_active());
        assert!(union.started_on.is_none());
        assert!(union.ended_on.is_none());
    }

    #[test]
    fn test_union_dissolve() {
        let mut union = Union::new(UnionKind::Partnership);
        let ended = NaiveDate::from_ymd_opt(2020, 6, 1).unwrap();

        union.dissolve(Some(ended));

        assert_eq!(union.status, UnionStatus::Dissolved);
        assert!(!union.is_active());
        assert_eq!(union.ended_on, Some(ended));
    }

    #[test]
    fn test_partner_slots_order() {
        assert!(PartnerSlot::First < PartnerSlot::Second);
    }

    #[test]
    fn test_union_id_string_round_trip() {
        let id = UnionId::new();
        let parsed = UnionId::from_string(&id.to_string()).unwrap();

        assert_eq!(parsed, id);
        assert!(UnionId::from_string("not-a-ulid").is_err());
    }

    #[test]
    fn test_new_union_builder() {
        let a = PersonId::new();
        let b = PersonId::new();
        let started = NaiveDate::from_ymd_opt(1995, 9, 2).unwrap();

        let new_union = NewUnion::new(a)
            .with_partner(b)
            .with_kind(UnionKind::Partnership)
            .with_started_on(started);

        assert_eq!(new_union.first_partner, a);
        assert_eq!(new_union.second_partner, Some(b));
        assert_eq!(new_union.kind, UnionKind::Partnership);
        assert_eq!(new_union.started_on, Some(started));
    }
}
