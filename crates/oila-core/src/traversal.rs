//! Family tree traversal engines.
//!
//! Traversal runs over a [`Household`] snapshot. People connect only
//! through unions: expanding a person means visiting every union they
//! belong to (as partner or as child) and discovering that union's
//! other members. Results are rendered as a [`TreeView`] with
//! deterministic id-ascending ordering.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::household::Household;
use crate::person::{Person, PersonId};
use crate::union::{UnionId, UnionView};

/// Result of a tree walk: the reachable people and the unions
/// connecting them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeView {
    /// The person the walk started from
    pub root: PersonId,

    /// Reached persons, id ascending
    pub persons: Vec<Person>,

    /// Reached unions with partner and child links attached, id
    /// ascending
    pub unions: Vec<UnionView>,
}

/// Tree traversal engine
pub struct TreeWalker;

impl TreeWalker {
    /// Walk the family tree around `root` in both directions, bounded
    /// by `max_depth` union-hops.
    ///
    /// People at the limit depth are included in the result but not
    /// expanded further; `max_depth = 0` yields the root alone.
    pub fn tree(household: &Household, root: PersonId, max_depth: u32) -> Result<TreeView> {
        if household.person(root).is_none() {
            return Err(Error::PersonNotFound(root));
        }

        tracing::debug!("Walking tree: root={}, max_depth={}", root, max_depth);

        let mut visited_persons: BTreeSet<PersonId> = BTreeSet::new();
        let mut visited_unions: BTreeSet<UnionId> = BTreeSet::new();
        let mut queue: VecDeque<(PersonId, u32)> = VecDeque::new();

        visited_persons.insert(root);
        queue.push_back((root, 0));

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }

            let unions = household
                .unions_with_partner(current)
                .into_iter()
                .chain(household.unions_with_child(current));

            for union_id in unions {
                visited_unions.insert(union_id);
                for member in Self::members(household, union_id) {
                    if visited_persons.insert(member) {
                        queue.push_back((member, depth + 1));
                    }
                }
            }
        }

        tracing::debug!(
            "Tree walk reached {} persons, {} unions",
            visited_persons.len(),
            visited_unions.len()
        );

        Ok(Self::build_view(
            household,
            root,
            &visited_persons,
            &visited_unions,
        ))
    }

    /// Walk upward from `root` through parental unions, unbounded.
    ///
    /// Only the partners of a reached parental union continue the walk;
    /// the root's siblings stay out of the result even though their
    /// links appear on the rendered unions.
    pub fn ancestors(household: &Household, root: PersonId) -> Result<TreeView> {
        if household.person(root).is_none() {
            return Err(Error::PersonNotFound(root));
        }

        let mut visited_persons: BTreeSet<PersonId> = BTreeSet::new();
        let mut visited_unions: BTreeSet<UnionId> = BTreeSet::new();
        let mut queue: VecDeque<PersonId> = VecDeque::new();

        visited_persons.insert(root);
        queue.push_back(root);

        while let Some(current) = queue.pop_front() {
            for union_id in household.unions_with_child(current) {
                visited_unions.insert(union_id);
                for link in household.partners_of(union_id) {
                    if visited_persons.insert(link.person_id) {
                        queue.push_back(link.person_id);
                    }
                }
            }
        }

        tracing::debug!(
            "Ancestor walk from {} reached {} persons",
            root,
            visited_persons.len()
        );

        Ok(Self::build_view(
            household,
            root,
            &visited_persons,
            &visited_unions,
        ))
    }

    /// Walk downward from `root` through partnered unions, unbounded.
    ///
    /// Co-partners of reached unions are recorded but never expanded,
    /// so the walk cannot wander off into an in-law family; only
    /// children seed further expansion.
    pub fn descendants(household: &Household, root: PersonId) -> Result<TreeView> {
        if household.person(root).is_none() {
            return Err(Error::PersonNotFound(root));
        }

        // View membership and queue admission are separate sets: a
        // person recorded as a co-partner may later surface as a child
        // of another reached union and must still be expanded then.
        let mut recorded: BTreeSet<PersonId> = BTreeSet::new();
        let mut expanded: BTreeSet<PersonId> = BTreeSet::new();
        let mut visited_unions: BTreeSet<UnionId> = BTreeSet::new();
        let mut queue: VecDeque<PersonId> = VecDeque::new();

        recorded.insert(root);
        expanded.insert(root);
        queue.push_back(root);

        while let Some(current) = queue.pop_front() {
            for union_id in household.unions_with_partner(current) {
                visited_unions.insert(union_id);
                for link in household.partners_of(union_id) {
                    recorded.insert(link.person_id);
                }
                for link in household.children_of(union_id) {
                    recorded.insert(link.person_id);
                    if expanded.insert(link.person_id) {
                        queue.push_back(link.person_id);
                    }
                }
            }
        }

        tracing::debug!(
            "Descendant walk from {} reached {} persons",
            root,
            recorded.len()
        );

        Ok(Self::build_view(household, root, &recorded, &visited_unions))
    }

    /// Everyone attached to a union, partners then children
    fn members(household: &Household, union_id: UnionId) -> Vec<PersonId> {
        household
            .partners_of(union_id)
            .into_iter()
            .map(|link| link.person_id)
            .chain(
                household
                    .children_of(union_id)
                    .into_iter()
                    .map(|link| link.person_id),
            )
            .collect()
    }

    /// Render visited sets into a view; ids with no backing record are
    /// silently dropped rather than failing the walk
    fn build_view(
        household: &Household,
        root: PersonId,
        persons: &BTreeSet<PersonId>,
        unions: &BTreeSet<UnionId>,
    ) -> TreeView {
        TreeView {
            root,
            persons: persons
                .iter()
                .filter_map(|id| household.person(*id).cloned())
                .collect(),
            unions: unions
                .iter()
                .filter_map(|id| household.union_view(*id))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineage::{ChildLink, Lineage};
    use crate::person::Gender;
    use crate::union::{PartnerLink, PartnerSlot, Union, UnionKind, UnionStatus};

    // Bobo ═u0═ Buvi        Raqib ═u3═ Ona ═u1═ Ota
    //     │                       │         │
    //  Ota, Amaki              Ogay     Bola, Singil
    //
    // u3 is dissolved; Ogay belongs to Ona's earlier union only.
    struct Family {
        household: Household,
        bobo: PersonId,
        buvi: PersonId,
        amaki: PersonId,
        ota: PersonId,
        ona: PersonId,
        raqib: PersonId,
        ogay: PersonId,
        bola: PersonId,
        singil: PersonId,
        u0: UnionId,
        u1: UnionId,
        u3: UnionId,
    }

    fn create_test_family() -> Family {
        let mut household = Household::new();

        let bobo = Person::new("Bobo").with_gender(Gender::Male);
        let buvi = Person::new("Buvi").with_gender(Gender::Female);
        let amaki = Person::new("Amaki").with_gender(Gender::Male);
        let ota = Person::new("Ota").with_gender(Gender::Male);
        let ona = Person::new("Ona").with_gender(Gender::Female);
        let raqib = Person::new("Raqib").with_gender(Gender::Male);
        let ogay = Person::new("O'gay");
        let bola = Person::new("Bola").with_gender(Gender::Male);
        let singil = Person::new("Singil").with_gender(Gender::Female);

        let ids = (
            bobo.id, buvi.id, amaki.id, ota.id, ona.id, raqib.id, ogay.id, bola.id, singil.id,
        );

        let u0 = Union::new(UnionKind::Marriage);
        let u1 = Union::new(UnionKind::Marriage);
        let mut u3 = Union::new(UnionKind::Marriage);
        u3.status = UnionStatus::Dissolved;
        let (u0_id, u1_id, u3_id) = (u0.id, u1.id, u3.id);

        for person in [bobo, buvi, amaki, ota, ona, raqib, ogay, bola, singil] {
            household.insert_person(person);
        }
        for union in [u0, u1, u3] {
            household.insert_union(union);
        }

        household.insert_partner(PartnerLink::new(u0_id, ids.0, PartnerSlot::First));
        household.insert_partner(PartnerLink::new(u0_id, ids.1, PartnerSlot::Second));
        household.insert_child(ChildLink::new(u0_id, ids.3, Lineage::Biological));
        household.insert_child(ChildLink::new(u0_id, ids.2, Lineage::Biological));

        household.insert_partner(PartnerLink::new(u1_id, ids.3, PartnerSlot::First));
        household.insert_partner(PartnerLink::new(u1_id, ids.4, PartnerSlot::Second));
        household.insert_child(ChildLink::new(u1_id, ids.7, Lineage::Biological));
        household.insert_child(ChildLink::new(u1_id, ids.8, Lineage::Biological));

        household.insert_partner(PartnerLink::new(u3_id, ids.5, PartnerSlot::First));
        household.insert_partner(PartnerLink::new(u3_id, ids.4, PartnerSlot::Second));
        household.insert_child(ChildLink::new(u3_id, ids.6, Lineage::Biological));

        Family {
            household,
            bobo: ids.0,
            buvi: ids.1,
            amaki: ids.2,
            ota: ids.3,
            ona: ids.4,
            raqib: ids.5,
            ogay: ids.6,
            bola: ids.7,
            singil: ids.8,
            u0: u0_id,
            u1: u1_id,
            u3: u3_id,
        }
    }

    fn person_ids(view: &TreeView) -> Vec<PersonId> {
        view.persons.iter().map(|p| p.id).collect()
    }

    fn union_ids(view: &TreeView) -> Vec<UnionId> {
        view.unions.iter().map(|u| u.union.id).collect()
    }

    #[test]
    fn test_tree_depth_zero_is_root_alone() {
        let f = create_test_family();

        let view = TreeWalker::tree(&f.household, f.bola, 0).unwrap();

        assert_eq!(person_ids(&view), vec![f.bola]);
        assert!(view.unions.is_empty());
        assert_eq!(view.root, f.bola);
    }

    #[test]
    fn test_tree_depth_one_reaches_immediate_family() {
        let f = create_test_family();

        let view = TreeWalker::tree(&f.household, f.bola, 1).unwrap();
        let persons = person_ids(&view);

        // Bola's parental union brings parents and sister in
        assert!(persons.contains(&f.bola));
        assert!(persons.contains(&f.ota));
        assert!(persons.contains(&f.ona));
        assert!(persons.contains(&f.singil));
        // Grandparents need the parents to expand, which depth 1 forbids
        assert!(!persons.contains(&f.bobo));
        assert_eq!(union_ids(&view), vec![f.u1]);
    }

    #[test]
    fn test_tree_depth_two_reaches_grandparents_and_step_kin() {
        let f = create_test_family();

        let view = TreeWalker::tree(&f.household, f.bola, 2).unwrap();
        let persons = person_ids(&view);

        assert!(persons.contains(&f.bobo));
        assert!(persons.contains(&f.buvi));
        assert!(persons.contains(&f.amaki));
        // Ona expanded too: her earlier union and its child are in view
        assert!(persons.contains(&f.raqib));
        assert!(persons.contains(&f.ogay));

        let mut expected_unions = vec![f.u0, f.u1, f.u3];
        expected_unions.sort();
        assert_eq!(union_ids(&view), expected_unions);
    }

    #[test]
    fn test_ancestors_climb_without_siblings() {
        let f = create_test_family();

        let view = TreeWalker::ancestors(&f.household, f.bola).unwrap();
        let persons = person_ids(&view);

        let mut expected = vec![f.bola, f.ota, f.ona, f.bobo, f.buvi];
        expected.sort();
        assert_eq!(persons, expected);
        // Siblings are named on the rendered unions but not walked
        assert!(!persons.contains(&f.singil));
        assert!(!persons.contains(&f.amaki));
        // Ona's earlier marriage is not a parental union of anyone here
        assert!(!persons.contains(&f.raqib));

        let mut expected_unions = vec![f.u0, f.u1];
        expected_unions.sort();
        assert_eq!(union_ids(&view), expected_unions);
    }

    #[test]
    fn test_descendants_record_spouses_but_do_not_expand_them() {
        let f = create_test_family();

        let view = TreeWalker::descendants(&f.household, f.bobo).unwrap();
        let persons = person_ids(&view);

        // Full male line plus recorded spouses
        for id in [f.bobo, f.buvi, f.ota, f.amaki, f.ona, f.bola, f.singil] {
            assert!(persons.contains(&id));
        }
        // Ona is recorded as Ota's co-partner, but her earlier union is
        // never entered, so its members stay out
        assert!(!persons.contains(&f.raqib));
        assert!(!persons.contains(&f.ogay));

        let mut expected_unions = vec![f.u0, f.u1];
        expected_unions.sort();
        assert_eq!(union_ids(&view), expected_unions);
    }

    #[test]
    fn test_descendants_expand_kin_first_met_as_a_co_partner() {
        // Bobo ═uA═ Buvi → To'ng'ich (#1), Kenja (#2)
        //   Kenja ═uB═ Kelin → Qiz
        //   To'ng'ich ═uC═ Qiz          (childless)
        //   Qiz ═uD═ Kuyov → Chevara
        //
        // Qiz enters the walk twice: first as To'ng'ich's partner,
        // then as Kenja's daughter. Her branch must still be walked.
        let mut household = Household::new();

        let bobo = Person::new("Bobo").with_gender(Gender::Male);
        let buvi = Person::new("Buvi").with_gender(Gender::Female);
        let tongich = Person::new("To'ng'ich").with_gender(Gender::Male);
        let kenja = Person::new("Kenja").with_gender(Gender::Male);
        let kelin = Person::new("Kelin").with_gender(Gender::Female);
        let qiz = Person::new("Qiz").with_gender(Gender::Female);
        let kuyov = Person::new("Kuyov").with_gender(Gender::Male);
        let chevara = Person::new("Chevara");

        let ids = (
            bobo.id, buvi.id, tongich.id, kenja.id, kelin.id, qiz.id, kuyov.id, chevara.id,
        );

        let (ua, ub, uc, ud) = (
            Union::new(UnionKind::Marriage),
            Union::new(UnionKind::Marriage),
            Union::new(UnionKind::Marriage),
            Union::new(UnionKind::Marriage),
        );
        let (ua_id, ub_id, uc_id, ud_id) = (ua.id, ub.id, uc.id, ud.id);

        for person in [bobo, buvi, tongich, kenja, kelin, qiz, kuyov, chevara] {
            household.insert_person(person);
        }
        for union in [ua, ub, uc, ud] {
            household.insert_union(union);
        }

        household.insert_partner(PartnerLink::new(ua_id, ids.0, PartnerSlot::First));
        household.insert_partner(PartnerLink::new(ua_id, ids.1, PartnerSlot::Second));
        household
            .insert_child(ChildLink::new(ua_id, ids.2, Lineage::Biological).with_birth_order(1));
        household
            .insert_child(ChildLink::new(ua_id, ids.3, Lineage::Biological).with_birth_order(2));

        household.insert_partner(PartnerLink::new(ub_id, ids.3, PartnerSlot::First));
        household.insert_partner(PartnerLink::new(ub_id, ids.4, PartnerSlot::Second));
        household.insert_child(ChildLink::new(ub_id, ids.5, Lineage::Biological));

        household.insert_partner(PartnerLink::new(uc_id, ids.2, PartnerSlot::First));
        household.insert_partner(PartnerLink::new(uc_id, ids.5, PartnerSlot::Second));

        household.insert_partner(PartnerLink::new(ud_id, ids.5, PartnerSlot::First));
        household.insert_partner(PartnerLink::new(ud_id, ids.6, PartnerSlot::Second));
        household.insert_child(ChildLink::new(ud_id, ids.7, Lineage::Biological));

        let view = TreeWalker::descendants(&household, ids.0).unwrap();
        let persons = person_ids(&view);

        // Chevara hangs off Qiz's later union; only expanding Qiz
        // can reach the great-grandchild
        assert!(persons.contains(&ids.5));
        assert!(persons.contains(&ids.7));
        // Co-partners stay recorded without being expanded
        for id in [ids.1, ids.4, ids.6] {
            assert!(persons.contains(&id));
        }
        assert_eq!(persons.len(), 8);

        let mut expected_unions = vec![ua_id, ub_id, uc_id, ud_id];
        expected_unions.sort();
        assert_eq!(union_ids(&view), expected_unions);
    }

    #[test]
    fn test_view_ordering_is_stable() {
        let f = create_test_family();

        let first = TreeWalker::tree(&f.household, f.bola, 5).unwrap();
        let second = TreeWalker::tree(&f.household, f.bola, 5).unwrap();

        assert_eq!(first, second);
        assert!(first
            .persons
            .windows(2)
            .all(|pair| pair[0].id < pair[1].id));
        assert!(first
            .unions
            .windows(2)
            .all(|pair| pair[0].union.id < pair[1].union.id));
    }

    #[test]
    fn test_unions_render_ordered_links() {
        let f = create_test_family();

        let view = TreeWalker::tree(&f.household, f.bobo, 1).unwrap();
        let u0 = view
            .unions
            .iter()
            .find(|u| u.union.id == f.u0)
            .unwrap();

        assert_eq!(u0.partners[0].slot, PartnerSlot::First);
        assert_eq!(u0.partners[0].person_id, f.bobo);
        assert_eq!(u0.partners[1].person_id, f.buvi);
        assert_eq!(u0.children.len(), 2);
    }

    #[test]
    fn test_unknown_root_is_an_error() {
        let f = create_test_family();
        let ghost = PersonId::new();

        assert!(matches!(
            TreeWalker::tree(&f.household, ghost, 3),
            Err(Error::PersonNotFound(id)) if id == ghost
        ));
        assert!(TreeWalker::ancestors(&f.household, ghost).is_err());
        assert!(TreeWalker::descendants(&f.household, ghost).is_err());
    }
}
