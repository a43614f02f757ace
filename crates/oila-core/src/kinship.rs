//! Kinship calculation between two people.
//!
//! The calculator classifies a (viewer, target) pair by their closest
//! common ancestor: `steps_up` from the viewer to that ancestor and
//! `steps_down` from the ancestor to the target select the base term,
//! refined by the target's gender, the side of the family the path
//! climbs through, and, for siblings, relative birth order. Spouses and
//! in-laws are recognized before and after the blood search. The result
//! always carries both directions, because Uzbek kin terms are not
//! symmetric: my otam's counterpart is his farzandim.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::household::Household;
use crate::limits::KIN_SPAN_CEILING;
use crate::person::{Gender, Person, PersonId};
use crate::traversal::TreeView;
use crate::vocabulary::{
    child_in_law_label, kin_label, parent_in_law_label, spouse_label, Side, RELATIVE_LABEL,
    SELF_LABEL, UNRELATED_LABEL,
};

/// How the target relates to the viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kinship {
    /// What the viewer calls the target
    pub label: String,

    /// What the target calls the viewer
    pub reverse_label: String,

    /// Steps from the viewer up to the common ancestor, when blood
    /// related
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps_up: Option<u32>,

    /// Steps from the common ancestor down to the target, when blood
    /// related
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps_down: Option<u32>,

    /// Side of the family the viewer's path climbs through
    pub side: Side,
}

/// A person from a labeled tree, tagged with what the viewer calls them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledPerson {
    pub person: Person,
    pub label: String,
}

/// One ancestor in a distance map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AncestorEntry {
    /// Minimum upward steps from the map's root to this ancestor
    pub steps: u32,

    /// The root's parent through which this ancestor was first reached;
    /// `None` for the root itself
    pub first_step: Option<PersonId>,
}

/// Map every ancestor of `root` to its minimum upward distance.
///
/// Upward BFS through parental unions; the root sits in the map at
/// distance zero. Each entry remembers the depth-one parent its
/// shortest path goes through, which later decides the paternal or
/// maternal side.
pub fn ancestor_map(household: &Household, root: PersonId) -> BTreeMap<PersonId, AncestorEntry> {
    let mut map = BTreeMap::new();
    let mut queue = VecDeque::new();

    let origin = AncestorEntry {
        steps: 0,
        first_step: None,
    };
    map.insert(root, origin);
    queue.push_back((root, origin));

    while let Some((person, entry)) = queue.pop_front() {
        for union_id in household.unions_with_child(person) {
            for link in household.partners_of(union_id) {
                let parent = link.person_id;
                if map.contains_key(&parent) {
                    continue;
                }
                let next = AncestorEntry {
                    steps: entry.steps + 1,
                    first_step: if entry.steps == 0 {
                        Some(parent)
                    } else {
                        entry.first_step
                    },
                };
                map.insert(parent, next);
                queue.push_back((parent, next));
            }
        }
    }

    map
}

/// The least-cost common ancestor of two distance maps, with the
/// viewer-side and target-side distances.
///
/// Cost is the summed distance; among equal-cost candidates the lowest
/// ancestor id wins, which is deterministic because the maps iterate in
/// id order. The degenerate shared-at-zero entry (same person in both
/// maps at distance zero) is skipped.
pub fn common_ancestor(
    viewer_map: &BTreeMap<PersonId, AncestorEntry>,
    target_map: &BTreeMap<PersonId, AncestorEntry>,
) -> Option<(PersonId, u32, u32)> {
    let mut best: Option<(PersonId, u32, u32)> = None;

    for (id, viewer_entry) in viewer_map {
        if let Some(target_entry) = target_map.get(id) {
            if viewer_entry.steps == 0 && target_entry.steps == 0 {
                continue;
            }
            let cost = viewer_entry.steps + target_entry.steps;
            let better = match best {
                Some((_, up, down)) => cost < up + down,
                None => true,
            };
            if better {
                best = Some((*id, viewer_entry.steps, target_entry.steps));
            }
        }
    }

    best
}

struct OneWay {
    label: String,
    steps_up: Option<u32>,
    steps_down: Option<u32>,
    side: Side,
}

/// Classify the target from one viewer's perspective
fn one_way(household: &Household, viewer: &Person, target: &Person) -> OneWay {
    if viewer.id == target.id {
        return OneWay {
            label: SELF_LABEL.to_string(),
            steps_up: Some(0),
            steps_down: Some(0),
            side: Side::None,
        };
    }

    if household.are_spouses(viewer.id, target.id) {
        return OneWay {
            label: spouse_label(target.gender).to_string(),
            steps_up: Some(0),
            steps_down: Some(0),
            side: Side::Spouse,
        };
    }

    let viewer_map = ancestor_map(household, viewer.id);
    let target_map = ancestor_map(household, target.id);

    if let Some((ancestor, up, down)) = common_ancestor(&viewer_map, &target_map) {
        let first_step = viewer_map.get(&ancestor).and_then(|entry| entry.first_step);
        let side = if up == 0 {
            Side::None
        } else {
            match first_step
                .and_then(|id| household.person(id))
                .map(|parent| parent.gender)
            {
                Some(Gender::Male) => Side::Paternal,
                Some(Gender::Female) => Side::Maternal,
                _ => Side::Unknown,
            }
        };
        let elder = elder_flag(up, down, viewer, target);

        let label = if up + down > KIN_SPAN_CEILING {
            RELATIVE_LABEL.to_string()
        } else {
            kin_label(up, down, target.gender, side, elder)
                .unwrap_or(RELATIVE_LABEL)
                .to_string()
        };

        tracing::debug!(
            "Kinship {} -> {}: ancestor={}, up={}, down={}, side={:?}",
            viewer.id,
            target.id,
            ancestor,
            up,
            down,
            side
        );

        return OneWay {
            label,
            steps_up: Some(up),
            steps_down: Some(down),
            side,
        };
    }

    // No shared blood: check marriage ties before giving up
    for spouse in household.spouses_of(viewer.id) {
        if household.parents_of(spouse).contains(&target.id) {
            return OneWay {
                label: parent_in_law_label(target.gender).to_string(),
                steps_up: None,
                steps_down: None,
                side: Side::Spouse,
            };
        }
    }
    for child in household.children_of_person(viewer.id) {
        if household.are_spouses(child, target.id) {
            return OneWay {
                label: child_in_law_label(target.gender).to_string(),
                steps_up: None,
                steps_down: None,
                side: Side::Spouse,
            };
        }
    }

    OneWay {
        label: UNRELATED_LABEL.to_string(),
        steps_up: None,
        steps_down: None,
        side: Side::None,
    }
}

/// Relative birth order, only meaningful for the sibling coordinate;
/// missing or equal dates leave it undetermined
fn elder_flag(up: u32, down: u32, viewer: &Person, target: &Person) -> Option<bool> {
    if up != 1 || down != 1 {
        return None;
    }
    match (viewer.birth_date, target.birth_date) {
        (Some(viewer_born), Some(target_born)) if target_born < viewer_born => Some(true),
        (Some(viewer_born), Some(target_born)) if target_born > viewer_born => Some(false),
        _ => None,
    }
}

/// Work out how `target` relates to `viewer`, in both directions.
///
/// Labels are not algebraically invertible, so the reverse direction is
/// computed by re-running the classification with the roles swapped.
/// The numeric fields describe the forward direction.
pub fn relate(household: &Household, viewer: PersonId, target: PersonId) -> Result<Kinship> {
    let viewer_person = household
        .person(viewer)
        .ok_or(Error::PersonNotFound(viewer))?;
    let target_person = household
        .person(target)
        .ok_or(Error::PersonNotFound(target))?;

    let forward = one_way(household, viewer_person, target_person);
    let reverse = one_way(household, target_person, viewer_person);

    Ok(Kinship {
        label: forward.label,
        reverse_label: reverse.label,
        steps_up: forward.steps_up,
        steps_down: forward.steps_down,
        side: forward.side,
    })
}

/// Label every person of a computed tree from one viewer's perspective.
///
/// A single person failing to classify falls back to the generic
/// relative label; the batch never aborts.
pub fn label_tree(household: &Household, tree: &TreeView, viewer: PersonId) -> Vec<LabeledPerson> {
    tree.persons
        .iter()
        .map(|person| {
            let label = match relate(household, viewer, person.id) {
                Ok(kinship) => kinship.label,
                Err(error) => {
                    tracing::warn!(
                        "Labeling {} from viewer {} failed ({}); using generic label",
                        person.id,
                        viewer,
                        error
                    );
                    RELATIVE_LABEL.to_string()
                }
            };
            LabeledPerson {
                person: person.clone(),
                label,
            }
        })
        .collect()
}
