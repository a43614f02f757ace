//! Household snapshot and store trait definition

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::lineage::ChildLink;
use crate::person::{Person, PersonId};
use crate::relationship::{RelationshipEdge, RelationshipKind};
use crate::union::{PartnerLink, Union, UnionId, UnionStatus, UnionView};

/// Materialized view of one household's entire kinship state.
///
/// Engines run synchronously over a snapshot; the store hands one out
/// per logical request, so validation reads and traversals see a single
/// consistent state. Collections are ordered so that iteration, and
/// therefore every derived listing, is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Household {
    pub persons: BTreeMap<PersonId, Person>,
    pub unions: BTreeMap<UnionId, Union>,
    pub partner_links: Vec<PartnerLink>,
    pub child_links: Vec<ChildLink>,
    pub edges: Vec<RelationshipEdge>,
}

impl Household {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert or replace a person
    pub fn insert_person(&mut self, person: Person) {
        self.persons.insert(person.id, person);
    }

    /// Insert or replace a union record
    pub fn insert_union(&mut self, union: Union) {
        self.unions.insert(union.id, union);
    }

    /// Attach a partner to a union
    pub fn insert_partner(&mut self, link: PartnerLink) {
        self.partner_links.push(link);
    }

    /// Detach a partner from a union; returns false if absent
    pub fn remove_partner(&mut self, union_id: UnionId, person: PersonId) -> bool {
        let before = self.partner_links.len();
        self.partner_links
            .retain(|link| !(link.union_id == union_id && link.person_id == person));
        self.partner_links.len() < before
    }

    /// Attach a child to a union
    pub fn insert_child(&mut self, link: ChildLink) {
        self.child_links.push(link);
    }

    /// Detach a child from a union; returns false if absent
    pub fn remove_child(&mut self, union_id: UnionId, person: PersonId) -> bool {
        let before = self.child_links.len();
        self.child_links
            .retain(|link| !(link.union_id == union_id && link.person_id == person));
        self.child_links.len() < before
    }

    /// Store a relationship edge unless an identical `(from, to, kind)`
    /// edge already exists
    pub fn insert_edge(&mut self, edge: RelationshipEdge) {
        if !self.has_edge(edge.from, edge.to, edge.kind) {
            self.edges.push(edge);
        }
    }

    /// Remove the `(from, to, kind)` edge and any reciprocal
    /// `(to, from, k)` edge whose kind is in `reciprocals`; returns the
    /// number of edges removed
    pub fn remove_edge_pair(
        &mut self,
        from: PersonId,
        to: PersonId,
        kind: RelationshipKind,
        reciprocals: &[RelationshipKind],
    ) -> usize {
        let before = self.edges.len();
        self.edges.retain(|edge| {
            let forward = edge.from == from && edge.to == to && edge.kind == kind;
            let reverse =
                edge.from == to && edge.to == from && reciprocals.contains(&edge.kind);
            !(forward || reverse)
        });
        before - self.edges.len()
    }

    /// Update a union's status and end date; returns false if the
    /// union does not exist
    pub fn set_union_status(
        &mut self,
        union_id: UnionId,
        status: UnionStatus,
        ended_on: Option<NaiveDate>,
    ) -> bool {
        match self.unions.get_mut(&union_id) {
            Some(union) => {
                match status {
                    UnionStatus::Dissolved => union.dissolve(ended_on),
                    UnionStatus::Active => {
                        union.status = UnionStatus::Active;
                        union.ended_on = None;
                        union.touch();
                    }
                }
                true
            }
            None => false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Get a person by id
    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.persons.get(&id)
    }

    /// Get a union record by id
    pub fn union(&self, id: UnionId) -> Option<&Union> {
        self.unions.get(&id)
    }

    /// Get a union with its partner and child links eagerly attached
    pub fn union_view(&self, id: UnionId) -> Option<UnionView> {
        let union = self.unions.get(&id)?.clone();
        Some(UnionView {
            union,
            partners: self.partners_of(id),
            children: self.children_of(id),
        })
    }

    /// Partner links of a union, ordered by slot
    pub fn partners_of(&self, union_id: UnionId) -> Vec<PartnerLink> {
        let mut links: Vec<PartnerLink> = self
            .partner_links
            .iter()
            .filter(|link| link.union_id == union_id)
            .copied()
            .collect();
        links.sort_by_key(|link| (link.slot, link.person_id));
        links
    }

    /// Child links of a union, in lineage and birth order
    pub fn children_of(&self, union_id: UnionId) -> Vec<ChildLink> {
        let mut links: Vec<ChildLink> = self
            .child_links
            .iter()
            .filter(|link| link.union_id == union_id)
            .copied()
            .collect();
        links.sort_by_key(|link| link.ordering_key());
        links
    }

    /// Unions in which a person participates as a partner
    pub fn unions_with_partner(&self, person: PersonId) -> Vec<UnionId> {
        self.partner_links
            .iter()
            .filter(|link| link.person_id == person)
            .map(|link| link.union_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Unions in which a person is recorded as a child
    pub fn unions_with_child(&self, person: PersonId) -> Vec<UnionId> {
        self.child_links
            .iter()
            .filter(|link| link.person_id == person)
            .map(|link| link.union_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Parents of a person: the partners of every union the person is a
    /// child of
    pub fn parents_of(&self, person: PersonId) -> Vec<PersonId> {
        let mut parents = BTreeSet::new();
        for union_id in self.unions_with_child(person) {
            for link in self.partners_of(union_id) {
                parents.insert(link.person_id);
            }
        }
        parents.into_iter().collect()
    }

    /// Co-partners of a person across all unions, dissolved included
    pub fn spouses_of(&self, person: PersonId) -> Vec<PersonId> {
        let mut spouses = BTreeSet::new();
        for union_id in self.unions_with_partner(person) {
            for link in self.partners_of(union_id) {
                if link.person_id != person {
                    spouses.insert(link.person_id);
                }
            }
        }
        spouses.into_iter().collect()
    }

    /// Children of a person across all their unions
    pub fn children_of_person(&self, person: PersonId) -> Vec<PersonId> {
        let mut children = BTreeSet::new();
        for union_id in self.unions_with_partner(person) {
            for link in self.children_of(union_id) {
                children.insert(link.person_id);
            }
        }
        children.into_iter().collect()
    }

    /// Whether two people share a union as partners, dissolved included
    pub fn are_spouses(&self, a: PersonId, b: PersonId) -> bool {
        self.unions_with_partner(a)
            .iter()
            .any(|union_id| self.partners_of(*union_id).iter().any(|p| p.person_id == b))
    }

    /// The union a person is a biological child of, if recorded
    pub fn biological_parent_union(&self, person: PersonId) -> Option<UnionId> {
        self.child_links
            .iter()
            .find(|link| link.person_id == person && link.lineage.is_biological())
            .map(|link| link.union_id)
    }

    /// Relationship edges declared from a person's perspective, ordered
    /// by target then kind
    pub fn edges_from(&self, person: PersonId) -> Vec<RelationshipEdge> {
        let mut edges: Vec<RelationshipEdge> = self
            .edges
            .iter()
            .filter(|edge| edge.from == person)
            .cloned()
            .collect();
        edges.sort_by_key(|edge| (edge.to, edge.kind));
        edges
    }

    /// Whether a `(from, to, kind)` edge exists
    pub fn has_edge(&self, from: PersonId, to: PersonId, kind: RelationshipKind) -> bool {
        self.edges
            .iter()
            .any(|edge| edge.from == from && edge.to == to && edge.kind == kind)
    }
}

/// Main trait for household storage backends
///
/// Mutating methods apply their writes atomically with respect to
/// `snapshot`: a snapshot never observes half of a multi-collection
/// write.
#[async_trait]
pub trait HouseholdStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Initialize the backend
    async fn initialize(&self) -> Result<()>;

    /// Close the backend
    async fn close(&self) -> Result<()>;

    /// Check backend health
    async fn health_check(&self) -> Result<bool>;

    // ─────────────────────────────────────────────────────────────────────────
    // Snapshot
    // ─────────────────────────────────────────────────────────────────────────

    /// Materialize the household state for one logical request
    async fn snapshot(&self) -> Result<Household>;

    // ─────────────────────────────────────────────────────────────────────────
    // Person Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert or update a person
    async fn save_person(&self, person: &Person) -> Result<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Union Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a union together with its initial partner links
    async fn insert_union(&self, union: &Union, partners: &[PartnerLink]) -> Result<()>;

    /// Attach a partner to an existing union
    async fn insert_partner(&self, link: &PartnerLink) -> Result<()>;

    /// Detach a partner from a union
    async fn delete_partner(&self, union_id: UnionId, person: PersonId) -> Result<()>;

    /// Update a union's status and end date
    async fn set_union_status(
        &self,
        union_id: UnionId,
        status: UnionStatus,
        ended_on: Option<NaiveDate>,
    ) -> Result<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Child Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Attach a child to a union
    async fn insert_child(&self, link: &ChildLink) -> Result<()>;

    /// Detach a child from a union
    async fn delete_child(&self, union_id: UnionId, person: PersonId) -> Result<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Relationship Edge Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Store a forward edge and its reciprocal in one write
    async fn insert_edge_pair(
        &self,
        forward: &RelationshipEdge,
        inverse: &RelationshipEdge,
    ) -> Result<()>;

    /// Remove an edge and its reciprocal in one write
    async fn delete_edge_pair(
        &self,
        from: PersonId,
        to: PersonId,
        kind: RelationshipKind,
        reciprocals: &[RelationshipKind],
    ) -> Result<()>;
}
