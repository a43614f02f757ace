//! Family service facade.
//!
//! Ties the pure engines to a storage backend: every call takes one
//! snapshot, runs validation and computation against it, and only then
//! delegates writes to the store. A rejected mutation therefore never
//! leaves partial state behind. Tested end to end against the in-memory
//! backend in the storage crate.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::household::{Household, HouseholdStore};
use crate::kinship::{self, Kinship, LabeledPerson};
use crate::limits::{validate_tree_depth, DEFAULT_TREE_DEPTH};
use crate::lineage::{ChildLink, NewChild};
use crate::person::{Gender, PersonId};
use crate::relationship::{
    edge_pair, edge_vocabulary, EdgeKindInfo, RelationshipEdge, RelationshipKind,
};
use crate::traversal::{TreeView, TreeWalker};
use crate::union::{NewUnion, PartnerLink, PartnerSlot, Union, UnionId, UnionStatus, UnionView};
use crate::validate::{self, ValidationError};

/// A bounded tree with every person labeled from one viewer's
/// perspective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledTree {
    /// The person the labels speak for
    pub viewer: PersonId,

    /// The person the walk started from
    pub root: PersonId,

    /// Reached persons with their labels, id ascending
    pub persons: Vec<LabeledPerson>,

    /// Reached unions, id ascending
    pub unions: Vec<UnionView>,
}

/// High-level entry point for household reads and mutations
pub struct FamilyService<S> {
    store: Arc<S>,
}

impl<S: HouseholdStore> FamilyService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Walk the family tree around `root`, bounded by `depth` union
    /// hops (defaults to [`DEFAULT_TREE_DEPTH`])
    pub async fn tree(&self, root: PersonId, depth: Option<u32>) -> Result<TreeView> {
        let depth = depth.unwrap_or(DEFAULT_TREE_DEPTH);
        validate_tree_depth(depth)?;
        let household = self.store.snapshot().await?;
        TreeWalker::tree(&household, root, depth)
    }

    /// Full ancestor closure of a person
    pub async fn ancestors(&self, root: PersonId) -> Result<TreeView> {
        let household = self.store.snapshot().await?;
        TreeWalker::ancestors(&household, root)
    }

    /// Full descendant closure of a person
    pub async fn descendants(&self, root: PersonId) -> Result<TreeView> {
        let household = self.store.snapshot().await?;
        TreeWalker::descendants(&household, root)
    }

    /// How `target` relates to `viewer`, in both directions
    pub async fn relationship(&self, viewer: PersonId, target: PersonId) -> Result<Kinship> {
        let household = self.store.snapshot().await?;
        kinship::relate(&household, viewer, target)
    }

    /// Tree around `viewer` with every reached person labeled from the
    /// viewer's perspective
    pub async fn labeled_tree(&self, viewer: PersonId, depth: Option<u32>) -> Result<LabeledTree> {
        let depth = depth.unwrap_or(DEFAULT_TREE_DEPTH);
        validate_tree_depth(depth)?;
        let household = self.store.snapshot().await?;
        let tree = TreeWalker::tree(&household, viewer, depth)?;
        let persons = kinship::label_tree(&household, &tree, viewer);

        Ok(LabeledTree {
            viewer,
            root: tree.root,
            persons,
            unions: tree.unions,
        })
    }

    /// The fixed edge-kind vocabulary with labels and categories
    pub fn relationship_vocabulary(&self) -> Vec<EdgeKindInfo> {
        edge_vocabulary()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Union Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a union with one or two initial partners
    pub async fn create_union(&self, new_union: NewUnion) -> Result<UnionView> {
        let household = self.store.snapshot().await?;
        Self::require_person(&household, new_union.first_partner)?;
        if let Some(second) = new_union.second_partner {
            Self::require_person(&household, second)?;
            validate::distinct_partners(new_union.first_partner, second)?;
            validate::no_duplicate_active_union(&household, new_union.first_partner, second)?;
        }

        let mut union = Union::new(new_union.kind);
        if let Some(started) = new_union.started_on {
            union = union.with_started_on(started);
        }
        let union_id = union.id;

        let mut partners = vec![PartnerLink::new(
            union_id,
            new_union.first_partner,
            PartnerSlot::First,
        )];
        if let Some(second) = new_union.second_partner {
            partners.push(PartnerLink::new(union_id, second, PartnerSlot::Second));
        }

        self.store.insert_union(&union, &partners).await?;
        tracing::info!(
            "Created union {} with {} partner(s)",
            union_id,
            partners.len()
        );
        self.refreshed_union(union_id).await
    }

    /// Attach a partner to an existing union
    pub async fn add_partner(&self, union_id: UnionId, person: PersonId) -> Result<UnionView> {
        let household = self.store.snapshot().await?;
        Self::require_union(&household, union_id)?;
        Self::require_person(&household, person)?;
        validate::union_has_room(&household, union_id)?;
        validate::not_already_partner(&household, union_id, person)?;
        for link in household.partners_of(union_id) {
            validate::no_duplicate_active_union(&household, link.person_id, person)?;
        }
        validate::no_partner_cycle(&household, union_id, person)?;

        let slot = if household
            .partners_of(union_id)
            .iter()
            .any(|link| link.slot == PartnerSlot::First)
        {
            PartnerSlot::Second
        } else {
            PartnerSlot::First
        };

        self.store
            .insert_partner(&PartnerLink::new(union_id, person, slot))
            .await?;
        tracing::info!("Added partner {} to union {}", person, union_id);
        self.refreshed_union(union_id).await
    }

    /// Detach a partner from a union
    pub async fn remove_partner(&self, union_id: UnionId, person: PersonId) -> Result<UnionView> {
        let household = self.store.snapshot().await?;
        Self::require_union(&household, union_id)?;
        if !household
            .partners_of(union_id)
            .iter()
            .any(|link| link.person_id == person)
        {
            return Err(ValidationError::NotAPartner { person, union_id }.into());
        }

        self.store.delete_partner(union_id, person).await?;
        tracing::info!("Removed partner {} from union {}", person, union_id);
        self.refreshed_union(union_id).await
    }

    /// Mark a union dissolved, keeping its links in place
    pub async fn dissolve_union(
        &self,
        union_id: UnionId,
        ended_on: Option<NaiveDate>,
    ) -> Result<UnionView> {
        let household = self.store.snapshot().await?;
        let union = household
            .union(union_id)
            .ok_or(Error::UnionNotFound(union_id))?;
        if !union.is_active() {
            return Err(ValidationError::AlreadyDissolved(union_id).into());
        }

        self.store
            .set_union_status(union_id, UnionStatus::Dissolved, ended_on)
            .await?;
        tracing::info!("Dissolved union {}", union_id);
        self.refreshed_union(union_id).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Child Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Attach a child to a union
    pub async fn add_child(&self, union_id: UnionId, new_child: NewChild) -> Result<UnionView> {
        let household = self.store.snapshot().await?;
        Self::require_union(&household, union_id)?;
        Self::require_person(&household, new_child.person_id)?;
        validate::not_already_child(&household, union_id, new_child.person_id)?;
        validate::single_biological_lineage(&household, new_child.person_id, new_child.lineage)?;
        validate::no_ancestor_cycle(&household, union_id, new_child.person_id)?;

        if let Some(person) = household.person(new_child.person_id) {
            if let Some(advisory) =
                validate::birth_consistency_advisory(&household, union_id, person)
            {
                tracing::warn!(
                    "Advisory for union {}: {}",
                    advisory.union_id,
                    advisory.message
                );
            }
        }

        let mut link = ChildLink::new(union_id, new_child.person_id, new_child.lineage);
        if let Some(order) = new_child.birth_order {
            link = link.with_birth_order(order);
        }

        self.store.insert_child(&link).await?;
        tracing::info!("Added child {} to union {}", new_child.person_id, union_id);
        self.refreshed_union(union_id).await
    }

    /// Detach a child from a union
    pub async fn remove_child(&self, union_id: UnionId, person: PersonId) -> Result<UnionView> {
        let household = self.store.snapshot().await?;
        Self::require_union(&household, union_id)?;
        if !household
            .children_of(union_id)
            .iter()
            .any(|link| link.person_id == person)
        {
            return Err(ValidationError::NotAChild { person, union_id }.into());
        }

        self.store.delete_child(union_id, person).await?;
        tracing::info!("Removed child {} from union {}", person, union_id);
        self.refreshed_union(union_id).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Relationship Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Declare "`to` is `from`'s `kind`", storing the edge and its
    /// derived reciprocal; returns both edges.
    ///
    /// A kind implying a gender for `to` back-fills the person record
    /// when their gender is still unknown.
    pub async fn add_relationship(
        &self,
        from: PersonId,
        to: PersonId,
        kind: RelationshipKind,
    ) -> Result<Vec<RelationshipEdge>> {
        validate::distinct_endpoints(from, to)?;
        let household = self.store.snapshot().await?;
        let from_person = household
            .person(from)
            .ok_or(Error::PersonNotFound(from))?
            .clone();
        let mut to_person = household
            .person(to)
            .ok_or(Error::PersonNotFound(to))?
            .clone();

        if let Some(implied) = kind.implied_gender() {
            if to_person.gender == Gender::Unknown {
                to_person.gender = implied;
                to_person.touch();
                self.store.save_person(&to_person).await?;
                tracing::info!("Back-filled gender of {} from {:?} edge", to, kind);
            }
        }

        let (forward, inverse) = edge_pair(&from_person, &to_person, kind);
        self.store.insert_edge_pair(&forward, &inverse).await?;
        tracing::info!("Linked {} -> {} as {:?}", from, to, kind);
        Ok(vec![forward, inverse])
    }

    /// Remove a declared edge and whichever gendered reciprocal was
    /// stored for it; removing an absent pair is a no-op
    pub async fn remove_relationship(
        &self,
        from: PersonId,
        to: PersonId,
        kind: RelationshipKind,
    ) -> Result<()> {
        let household = self.store.snapshot().await?;
        Self::require_person(&household, from)?;
        Self::require_person(&household, to)?;

        self.store
            .delete_edge_pair(from, to, kind, &kind.reciprocals())
            .await?;
        tracing::info!("Unlinked {} -> {} as {:?}", from, to, kind);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Re-read a union after a committed write
    async fn refreshed_union(&self, union_id: UnionId) -> Result<UnionView> {
        let household = self.store.snapshot().await?;
        household
            .union_view(union_id)
            .ok_or(Error::UnionNotFound(union_id))
    }

    fn require_person(household: &Household, id: PersonId) -> Result<()> {
        household
            .person(id)
            .map(|_| ())
            .ok_or(Error::PersonNotFound(id))
    }

    fn require_union(household: &Household, id: UnionId) -> Result<()> {
        household
            .union(id)
            .map(|_| ())
            .ok_or(Error::UnionNotFound(id))
    }
}
