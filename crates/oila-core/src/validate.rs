//! Mutation validators for the household graph.
//!
//! Every check is a pure function over a [`Household`] snapshot and
//! runs before any write is attempted, so a rejected mutation leaves
//! the stored state untouched. Checks return the specific violated
//! rule; advisory findings are reported separately and never block.

use std::collections::{BTreeSet, VecDeque};

use thiserror::Error;

use crate::household::Household;
use crate::lineage::Lineage;
use crate::person::{Person, PersonId};
use crate::union::UnionId;

/// A violated mutation rule
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Cannot partner a person with themselves: {0}")]
    SelfPartnership(PersonId),

    #[error("Cannot relate a person to themselves: {0}")]
    SelfRelationship(PersonId),

    #[error("Active union already links {a} and {b}")]
    DuplicateActiveUnion { a: PersonId, b: PersonId },

    #[error("Union already has two partners: {0}")]
    UnionFull(UnionId),

    #[error("Already a partner in union {union_id}: {person}")]
    AlreadyPartner { person: PersonId, union_id: UnionId },

    #[error("Biological parents already recorded for {person} in union {existing}")]
    DuplicateBiologicalLineage { person: PersonId, existing: UnionId },

    #[error("Already a child of union {union_id}: {person}")]
    AlreadyChild { person: PersonId, union_id: UnionId },

    #[error("Adding child {child} to union {union_id} would create an ancestry cycle")]
    AncestorCycle { union_id: UnionId, child: PersonId },

    #[error("Adding partner {partner} to union {union_id} would create an ancestry cycle")]
    PartnerCycle { union_id: UnionId, partner: PersonId },

    #[error("Not a partner in union {union_id}: {person}")]
    NotAPartner { person: PersonId, union_id: UnionId },

    #[error("Not a child of union {union_id}: {person}")]
    NotAChild { person: PersonId, union_id: UnionId },

    #[error("Union already dissolved: {0}")]
    AlreadyDissolved(UnionId),
}

/// A non-blocking finding attached to an otherwise valid mutation
#[derive(Debug, Clone, PartialEq)]
pub struct Advisory {
    pub union_id: UnionId,
    pub person_id: PersonId,
    pub message: String,
}

/// Everyone reachable upward from `start`: the person, their parents,
/// their parents' parents, through every lineage kind
fn ancestor_closure(household: &Household, start: PersonId) -> BTreeSet<PersonId> {
    let mut seen = BTreeSet::new();
    let mut queue = VecDeque::new();
    seen.insert(start);
    queue.push_back(start);

    while let Some(person) = queue.pop_front() {
        for union_id in household.unions_with_child(person) {
            for link in household.partners_of(union_id) {
                if seen.insert(link.person_id) {
                    queue.push_back(link.person_id);
                }
            }
        }
    }

    seen
}

/// Everyone reachable downward from `start`: the person, their
/// children, their children's children
fn descendant_closure(household: &Household, start: PersonId) -> BTreeSet<PersonId> {
    let mut seen = BTreeSet::new();
    let mut queue = VecDeque::new();
    seen.insert(start);
    queue.push_back(start);

    while let Some(person) = queue.pop_front() {
        for union_id in household.unions_with_partner(person) {
            for link in household.children_of(union_id) {
                if seen.insert(link.person_id) {
                    queue.push_back(link.person_id);
                }
            }
        }
    }

    seen
}

/// Reject a child attachment that would make someone their own
/// ancestor.
///
/// Checks both directions: no current partner of the union may already
/// descend from the candidate, and the candidate may not already appear
/// among a partner's ancestors. The closures include their starting
/// person, so attaching a person as a child of their own union is
/// caught here too.
pub fn no_ancestor_cycle(
    household: &Household,
    union_id: UnionId,
    candidate: PersonId,
) -> Result<(), ValidationError> {
    let descendants = descendant_closure(household, candidate);

    for link in household.partners_of(union_id) {
        if descendants.contains(&link.person_id)
            || ancestor_closure(household, link.person_id).contains(&candidate)
        {
            return Err(ValidationError::AncestorCycle {
                union_id,
                child: candidate,
            });
        }
    }

    Ok(())
}

/// Reject a partner attachment that would close an ancestry cycle from
/// the parent side: no existing child of the union may be the candidate
/// or one of the candidate's ancestors.
pub fn no_partner_cycle(
    household: &Household,
    union_id: UnionId,
    candidate: PersonId,
) -> Result<(), ValidationError> {
    let ancestors = ancestor_closure(household, candidate);

    for link in household.children_of(union_id) {
        if ancestors.contains(&link.person_id) {
            return Err(ValidationError::PartnerCycle {
                union_id,
                partner: candidate,
            });
        }
    }

    Ok(())
}

/// Reject a union between a person and themselves
pub fn distinct_partners(a: PersonId, b: PersonId) -> Result<(), ValidationError> {
    if a == b {
        return Err(ValidationError::SelfPartnership(a));
    }
    Ok(())
}

/// Reject a relationship edge from a person to themselves
pub fn distinct_endpoints(from: PersonId, to: PersonId) -> Result<(), ValidationError> {
    if from == to {
        return Err(ValidationError::SelfRelationship(from));
    }
    Ok(())
}

/// Reject a second active union between the same pair. Dissolved unions
/// between the pair do not count: re-marriage after dissolution is
/// allowed.
pub fn no_duplicate_active_union(
    household: &Household,
    a: PersonId,
    b: PersonId,
) -> Result<(), ValidationError> {
    for union_id in household.unions_with_partner(a) {
        let active = household
            .union(union_id)
            .map_or(false, |union| union.is_active());
        if active
            && household
                .partners_of(union_id)
                .iter()
                .any(|link| link.person_id == b)
        {
            return Err(ValidationError::DuplicateActiveUnion { a, b });
        }
    }
    Ok(())
}

/// Reject a third partner
pub fn union_has_room(household: &Household, union_id: UnionId) -> Result<(), ValidationError> {
    if household.partners_of(union_id).len() >= 2 {
        return Err(ValidationError::UnionFull(union_id));
    }
    Ok(())
}

/// Reject re-attaching an existing partner
pub fn not_already_partner(
    household: &Household,
    union_id: UnionId,
    person: PersonId,
) -> Result<(), ValidationError> {
    if household
        .partners_of(union_id)
        .iter()
        .any(|link| link.person_id == person)
    {
        return Err(ValidationError::AlreadyPartner { person, union_id });
    }
    Ok(())
}

/// Reject a second biological parent union for the same person.
/// Non-biological lineages may repeat freely.
pub fn single_biological_lineage(
    household: &Household,
    person: PersonId,
    lineage: Lineage,
) -> Result<(), ValidationError> {
    if !lineage.is_biological() {
        return Ok(());
    }
    if let Some(existing) = household.biological_parent_union(person) {
        return Err(ValidationError::DuplicateBiologicalLineage { person, existing });
    }
    Ok(())
}

/// Reject re-attaching an existing child
pub fn not_already_child(
    household: &Household,
    union_id: UnionId,
    person: PersonId,
) -> Result<(), ValidationError> {
    if household
        .children_of(union_id)
        .iter()
        .any(|link| link.person_id == person)
    {
        return Err(ValidationError::AlreadyChild { person, union_id });
    }
    Ok(())
}

/// Flag a child born before the union started. Dates are sparse and
/// often approximate, so this reports instead of rejecting.
pub fn birth_consistency_advisory(
    household: &Household,
    union_id: UnionId,
    child: &Person,
) -> Option<Advisory> {
    let union = household.union(union_id)?;
    let born = child.birth_date?;
    let started = union.started_on?;

    if born < started {
        return Some(Advisory {
            union_id,
            person_id: child.id,
            message: format!(
                "Birth date {} precedes union start date {}",
                born, started
            ),
        });
    }
    None
}
