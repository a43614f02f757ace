//! Uzbek kinship vocabulary.
//!
//! Kin terms are keyed by the pair's position relative to their closest
//! common ancestor: `up` steps from the viewer to the ancestor, `down`
//! steps from the ancestor to the target. (1,0) is a parent, (1,1) a
//! sibling, (2,1) an uncle or aunt, (2,2) a first cousin. Uzbek terms
//! also split on the target's gender, on which side of the family the
//! path climbs (amaki vs tog'a), and for siblings on relative age
//! (aka vs uka), so each coordinate pair can carry several entries.
//!
//! Lookup is first-match-wins over a fixed table. A `None` field on an
//! entry is a wildcard; a `Some` field must equal the queried value
//! exactly, so an unknown gender or side only ever reaches the neutral
//! entries.

use serde::{Deserialize, Serialize};

use crate::person::Gender;

/// Which side of the family a kinship path climbs through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// No climb, or side is not applicable
    #[default]
    None,
    /// Through the viewer's father
    Paternal,
    /// Through the viewer's mother
    Maternal,
    /// The first parent on the path has unknown gender
    Unknown,
    /// Related by marriage rather than blood
    Spouse,
}

/// Label for the viewer themselves
pub const SELF_LABEL: &str = "o'zim";

/// Fallback label for related pairs the vocabulary has no term for
pub const RELATIVE_LABEL: &str = "qarindoshim";

/// Label for pairs with no recorded connection at all
pub const UNRELATED_LABEL: &str = "begona";

/// One entry of the kin-term table
#[derive(Debug, Clone, Copy)]
pub struct KinTerm {
    pub up: u32,
    pub down: u32,
    pub gender: Option<Gender>,
    pub side: Option<Side>,
    pub elder: Option<bool>,
    pub label: &'static str,
}

const fn term(
    up: u32,
    down: u32,
    gender: Option<Gender>,
    side: Option<Side>,
    elder: Option<bool>,
    label: &'static str,
) -> KinTerm {
    KinTerm {
        up,
        down,
        gender,
        side,
        elder,
        label,
    }
}

/// The kin-term table, most specific entries first within each
/// coordinate pair. Coordinates without a neutral entry (uncles, aunts,
/// cousins, great-grandparents) intentionally fall through to the
/// generic relative label when gender or side is unknown.
static KIN_TABLE: &[KinTerm] = &[
    // (1,0) parents
    term(1, 0, Some(Gender::Male), None, None, "otam"),
    term(1, 0, Some(Gender::Female), None, None, "onam"),
    term(1, 0, None, None, None, "ota-onam"),
    // (0,1) children
    term(0, 1, Some(Gender::Male), None, None, "o'g'lim"),
    term(0, 1, Some(Gender::Female), None, None, "qizim"),
    term(0, 1, None, None, None, "farzandim"),
    // (1,1) siblings, split by relative age
    term(1, 1, Some(Gender::Male), None, Some(true), "akam"),
    term(1, 1, Some(Gender::Male), None, Some(false), "ukam"),
    term(1, 1, Some(Gender::Female), None, Some(true), "opam"),
    term(1, 1, Some(Gender::Female), None, Some(false), "singlim"),
    term(1, 1, None, None, None, "tug'ishganim"),
    // (2,0) grandparents
    term(2, 0, Some(Gender::Male), None, None, "bobom"),
    term(2, 0, Some(Gender::Female), None, None, "buvim"),
    term(2, 0, None, None, None, "bobo-buvim"),
    // (0,2) grandchildren
    term(0, 2, None, None, None, "nabiram"),
    // (2,1) uncles and aunts, split by family side
    term(2, 1, Some(Gender::Male), Some(Side::Paternal), None, "amakim"),
    term(2, 1, Some(Gender::Female), Some(Side::Paternal), None, "ammam"),
    term(2, 1, Some(Gender::Male), Some(Side::Maternal), None, "tog'am"),
    term(2, 1, Some(Gender::Female), Some(Side::Maternal), None, "xolam"),
    // (1,2) nieces and nephews
    term(1, 2, None, None, None, "jiyanim"),
    // (2,2) first cousins, split by family side
    term(2, 2, None, Some(Side::Paternal), None, "amakivachcham"),
    term(2, 2, None, Some(Side::Maternal), None, "xolavachcham"),
    // (3,0) great-grandparents
    term(3, 0, Some(Gender::Male), None, None, "katta bobom"),
    term(3, 0, Some(Gender::Female), None, None, "katta buvim"),
    // (0,3) great-grandchildren
    term(0, 3, None, None, None, "evaram"),
];

/// Look up the kin term for a blood-relationship coordinate pair.
///
/// Returns `None` when the table has no entry, including when a
/// side-split or gender-split coordinate is queried with the relevant
/// attribute unknown; callers fall back to [`RELATIVE_LABEL`].
pub fn kin_label(
    up: u32,
    down: u32,
    gender: Gender,
    side: Side,
    elder: Option<bool>,
) -> Option<&'static str> {
    KIN_TABLE
        .iter()
        .find(|entry| {
            entry.up == up
                && entry.down == down
                && entry.gender.map_or(true, |g| g == gender)
                && entry.side.map_or(true, |s| s == side)
                && entry.elder.map_or(true, |e| elder == Some(e))
        })
        .map(|entry| entry.label)
}

/// Label for the viewer's spouse, by the spouse's gender
pub fn spouse_label(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "erim",
        Gender::Female => "xotinim",
        Gender::Unknown => "turmush o'rtog'im",
    }
}

/// Label for a spouse's parent, by the parent's gender
pub fn parent_in_law_label(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "qaynotam",
        Gender::Female => "qaynonam",
        Gender::Unknown => "qaynota-qaynonam",
    }
}

/// Label for a child's spouse, by the spouse's gender
pub fn child_in_law_label(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "kuyovim",
        Gender::Female => "kelinim",
        Gender::Unknown => "kelin-kuyovim",
    }
}
