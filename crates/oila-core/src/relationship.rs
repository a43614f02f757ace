//! Named-relationship edges: the legacy direct-edge model.
//!
//! Predates the union/child-link graph and coexists with it over the
//! same person identity space. A relationship here is a stored directed
//! edge `(from, to, kind)` read as "`to` is `from`'s `<kind>`", always
//! paired with an automatically derived inverse edge. The two models
//! are deliberately not reconciled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::person::{Gender, Person, PersonId};

/// Unique identifier for a stored relationship edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub Ulid);

impl EdgeId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for EdgeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Broad grouping of edge kinds, used by vocabulary listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeCategory {
    Parents,
    Children,
    Spouse,
    Siblings,
    Grandparents,
    Grandchildren,
    Extended,
    InLaws,
    Other,
}

/// The fixed vocabulary of named relationship kinds.
///
/// Display labels are the Uzbek kin terms shown to users. Uzbek splits
/// siblings by relative age (aka/uka, opa/singil) and uncles/aunts by
/// family side (amaki/tog'a, amma/xola), which is why the kind set is
/// wider than an English one would be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Father,
    Mother,
    Parent,
    Son,
    Daughter,
    Child,
    Husband,
    Wife,
    Spouse,
    ElderBrother,
    YoungerBrother,
    ElderSister,
    YoungerSister,
    Sibling,
    Grandfather,
    Grandmother,
    Grandparent,
    Grandchild,
    PaternalUncle,
    MaternalUncle,
    PaternalAunt,
    MaternalAunt,
    NieceNephew,
    Cousin,
    FatherInLaw,
    MotherInLaw,
    SonInLaw,
    DaughterInLaw,
    Relative,
    Other,
}

impl RelationshipKind {
    /// Every kind, in vocabulary-listing order
    pub const ALL: [RelationshipKind; 30] = [
        RelationshipKind::Father,
        RelationshipKind::Mother,
        RelationshipKind::Parent,
        RelationshipKind::Son,
        RelationshipKind::Daughter,
        RelationshipKind::Child,
        RelationshipKind::Husband,
        RelationshipKind::Wife,
        RelationshipKind::Spouse,
        RelationshipKind::ElderBrother,
        RelationshipKind::YoungerBrother,
        RelationshipKind::ElderSister,
        RelationshipKind::YoungerSister,
        RelationshipKind::Sibling,
        RelationshipKind::Grandfather,
        RelationshipKind::Grandmother,
        RelationshipKind::Grandparent,
        RelationshipKind::Grandchild,
        RelationshipKind::PaternalUncle,
        RelationshipKind::MaternalUncle,
        RelationshipKind::PaternalAunt,
        RelationshipKind::MaternalAunt,
        RelationshipKind::NieceNephew,
        RelationshipKind::Cousin,
        RelationshipKind::FatherInLaw,
        RelationshipKind::MotherInLaw,
        RelationshipKind::SonInLaw,
        RelationshipKind::DaughterInLaw,
        RelationshipKind::Relative,
        RelationshipKind::Other,
    ];

    /// User-facing Uzbek label for the kind
    pub fn display_label(&self) -> &'static str {
        match self {
            RelationshipKind::Father => "otam",
            RelationshipKind::Mother => "onam",
            RelationshipKind::Parent => "ota-onam",
            RelationshipKind::Son => "o'g'lim",
            RelationshipKind::Daughter => "qizim",
            RelationshipKind::Child => "farzandim",
            RelationshipKind::Husband => "erim",
            RelationshipKind::Wife => "xotinim",
            RelationshipKind::Spouse => "turmush o'rtog'im",
            RelationshipKind::ElderBrother => "akam",
            RelationshipKind::YoungerBrother => "ukam",
            RelationshipKind::ElderSister => "opam",
            RelationshipKind::YoungerSister => "singlim",
            RelationshipKind::Sibling => "tug'ishganim",
            RelationshipKind::Grandfather => "bobom",
            RelationshipKind::Grandmother => "buvim",
            RelationshipKind::Grandparent => "bobo-buvim",
            RelationshipKind::Grandchild => "nabiram",
            RelationshipKind::PaternalUncle => "amakim",
            RelationshipKind::MaternalUncle => "tog'am",
            RelationshipKind::PaternalAunt => "ammam",
            RelationshipKind::MaternalAunt => "xolam",
            RelationshipKind::NieceNephew => "jiyanim",
            RelationshipKind::Cousin => "amakivachcham",
            RelationshipKind::FatherInLaw => "qaynotam",
            RelationshipKind::MotherInLaw => "qaynonam",
            RelationshipKind::SonInLaw => "kuyovim",
            RelationshipKind::DaughterInLaw => "kelinim",
            RelationshipKind::Relative => "qarindoshim",
            RelationshipKind::Other => "boshqa",
        }
    }

    /// Broad category the kind belongs to
    pub fn category(&self) -> EdgeCategory {
        match self {
            RelationshipKind::Father | RelationshipKind::Mother | RelationshipKind::Parent => {
                EdgeCategory::Parents
            }
            RelationshipKind::Son | RelationshipKind::Daughter | RelationshipKind::Child => {
                EdgeCategory::Children
            }
            RelationshipKind::Husband | RelationshipKind::Wife | RelationshipKind::Spouse => {
                EdgeCategory::Spouse
            }
            RelationshipKind::ElderBrother
            | RelationshipKind::YoungerBrother
            | RelationshipKind::ElderSister
            | RelationshipKind::YoungerSister
            | RelationshipKind::Sibling => EdgeCategory::Siblings,
            RelationshipKind::Grandfather
            | RelationshipKind::Grandmother
            | RelationshipKind::Grandparent => EdgeCategory::Grandparents,
            RelationshipKind::Grandchild => EdgeCategory::Grandchildren,
            RelationshipKind::PaternalUncle
            | RelationshipKind::MaternalUncle
            | RelationshipKind::PaternalAunt
            | RelationshipKind::MaternalAunt
            | RelationshipKind::NieceNephew
            | RelationshipKind::Cousin => EdgeCategory::Extended,
            RelationshipKind::FatherInLaw
            | RelationshipKind::MotherInLaw
            | RelationshipKind::SonInLaw
            | RelationshipKind::DaughterInLaw => EdgeCategory::InLaws,
            RelationshipKind::Relative | RelationshipKind::Other => EdgeCategory::Other,
        }
    }

    /// The inverse kind for the reciprocal edge.
    ///
    /// `source_gender` is the gender of the edge's `from` person: in
    /// "`to` is `from`'s father", the reciprocal says what `from` is to
    /// `to` (son, daughter, or the neutral child form).
    pub fn inverse(&self, source_gender: Gender) -> RelationshipKind {
        use Gender::{Female, Male, Unknown};
        use RelationshipKind::*;

        match self {
            Father | Mother | Parent => match source_gender {
                Male => Son,
                Female => Daughter,
                Unknown => Child,
            },
            Son | Daughter | Child => match source_gender {
                Male => Father,
                Female => Mother,
                Unknown => Parent,
            },
            Husband | Wife | Spouse => match source_gender {
                Male => Husband,
                Female => Wife,
                Unknown => Spouse,
            },
            ElderBrother | ElderSister => match source_gender {
                Male => YoungerBrother,
                Female => YoungerSister,
                Unknown => Sibling,
            },
            YoungerBrother | YoungerSister => match source_gender {
                Male => ElderBrother,
                Female => ElderSister,
                Unknown => Sibling,
            },
            // Relative age of the counterpart is unknowable here
            Sibling => Sibling,
            Grandfather | Grandmother | Grandparent => Grandchild,
            Grandchild => match source_gender {
                Male => Grandfather,
                Female => Grandmother,
                Unknown => Grandparent,
            },
            PaternalUncle | MaternalUncle | PaternalAunt | MaternalAunt => NieceNephew,
            // The edge alone cannot tell amaki from tog'a for the way back
            NieceNephew => Relative,
            Cousin => Cousin,
            FatherInLaw | MotherInLaw => match source_gender {
                Male => SonInLaw,
                Female => DaughterInLaw,
                Unknown => Relative,
            },
            SonInLaw | DaughterInLaw => match source_gender {
                Male => FatherInLaw,
                Female => MotherInLaw,
                Unknown => Relative,
            },
            Relative => Relative,
            Other => Other,
        }
    }

    /// All gendered variants the reciprocal edge could have been stored
    /// as. Used when tearing a pair down, so a gender learned after the
    /// pair was written cannot orphan the reciprocal.
    pub fn reciprocals(&self) -> [RelationshipKind; 3] {
        [
            self.inverse(Gender::Male),
            self.inverse(Gender::Female),
            self.inverse(Gender::Unknown),
        ]
    }

    /// Gender the kind implies for the edge's `to` person, if any.
    ///
    /// "`to` is `from`'s son" implies `to` is male; neutral kinds imply
    /// nothing.
    pub fn implied_gender(&self) -> Option<Gender> {
        use RelationshipKind::*;

        match self {
            Father | Son | Husband | ElderBrother | YoungerBrother | Grandfather
            | PaternalUncle | MaternalUncle | FatherInLaw | SonInLaw => Some(Gender::Male),
            Mother | Daughter | Wife | ElderSister | YoungerSister | Grandmother
            | PaternalAunt | MaternalAunt | MotherInLaw | DaughterInLaw => Some(Gender::Female),
            Parent | Child | Spouse | Sibling | Grandparent | Grandchild | NieceNephew
            | Cousin | Relative | Other => None,
        }
    }
}

/// A stored directed relationship edge: "`to` is `from`'s `kind`"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    /// Unique identifier
    pub id: EdgeId,

    /// The person from whose perspective the edge reads
    pub from: PersonId,

    /// The person the kind describes
    pub to: PersonId,

    /// Relationship kind
    pub kind: RelationshipKind,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl RelationshipEdge {
    pub fn new(from: PersonId, to: PersonId, kind: RelationshipKind) -> Self {
        Self {
            id: EdgeId::new(),
            from,
            to,
            kind,
            created_at: Utc::now(),
        }
    }
}

/// Build the forward edge and its reciprocal for one declaration.
///
/// The reciprocal's kind is selected by the declaring (`from`) person's
/// gender.
pub fn edge_pair(
    from: &Person,
    to: &Person,
    kind: RelationshipKind,
) -> (RelationshipEdge, RelationshipEdge) {
    let forward = RelationshipEdge::new(from.id, to.id, kind);
    let inverse = RelationshipEdge::new(to.id, from.id, kind.inverse(from.gender));
    (forward, inverse)
}

/// One entry of the edge-kind vocabulary listing.
///
/// Serialize-only: labels point into the static vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeKindInfo {
    pub kind: RelationshipKind,
    pub label: &'static str,
    pub category: EdgeCategory,
}

/// Enumerate the fixed edge-kind vocabulary with display labels and
/// categories.
pub fn edge_vocabulary() -> Vec<EdgeKindInfo> {
    RelationshipKind::ALL
        .iter()
        .map(|kind| EdgeKindInfo {
            kind: *kind,
            label: kind.display_label(),
            category: kind.category(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_follows_source_gender() {
        assert_eq!(
            RelationshipKind::Father.inverse(Gender::Male),
            RelationshipKind::Son
        );
        assert_eq!(
            RelationshipKind::Father.inverse(Gender::Female),
            RelationshipKind::Daughter
        );
        assert_eq!(
            RelationshipKind::Father.inverse(Gender::Unknown),
            RelationshipKind::Child
        );
        assert_eq!(
            RelationshipKind::Daughter.inverse(Gender::Female),
            RelationshipKind::Mother
        );
    }

    #[test]
    fn test_sibling_inverse_flips_relative_age() {
        assert_eq!(
            RelationshipKind::ElderBrother.inverse(Gender::Female),
            RelationshipKind::YoungerSister
        );
        assert_eq!(
            RelationshipKind::YoungerSister.inverse(Gender::Male),
            RelationshipKind::ElderBrother
        );
        assert_eq!(
            RelationshipKind::Sibling.inverse(Gender::Male),
            RelationshipKind::Sibling
        );
    }

    #[test]
    fn test_spouse_inverse() {
        assert_eq!(
            RelationshipKind::Husband.inverse(Gender::Female),
            RelationshipKind::Wife
        );
        assert_eq!(
            RelationshipKind::Wife.inverse(Gender::Male),
            RelationshipKind::Husband
        );
        assert_eq!(
            RelationshipKind::Spouse.inverse(Gender::Unknown),
            RelationshipKind::Spouse
        );
    }

    #[test]
    fn test_implied_gender() {
        assert_eq!(RelationshipKind::Son.implied_gender(), Some(Gender::Male));
        assert_eq!(
            RelationshipKind::Grandmother.implied_gender(),
            Some(Gender::Female)
        );
        assert_eq!(RelationshipKind::Child.implied_gender(), None);
        assert_eq!(RelationshipKind::Cousin.implied_gender(), None);
    }

    #[test]
    fn test_categories() {
        assert_eq!(RelationshipKind::Father.category(), EdgeCategory::Parents);
        assert_eq!(
            RelationshipKind::MaternalAunt.category(),
            EdgeCategory::Extended
        );
        assert_eq!(RelationshipKind::SonInLaw.category(), EdgeCategory::InLaws);
        assert_eq!(RelationshipKind::Other.category(), EdgeCategory::Other);
    }

    #[test]
    fn test_reciprocals_cover_all_gendered_variants() {
        let recips = RelationshipKind::Father.reciprocals();
        assert!(recips.contains(&RelationshipKind::Son));
        assert!(recips.contains(&RelationshipKind::Daughter));
        assert!(recips.contains(&RelationshipKind::Child));
    }

    #[test]
    fn test_edge_pair_construction() {
        let ota = Person::new("Ota").with_gender(Gender::Male);
        let bola = Person::new("Bola");

        // Bola declares: "Ota is my father"
        let (forward, inverse) = edge_pair(&bola, &ota, RelationshipKind::Father);

        assert_eq!(forward.from, bola.id);
        assert_eq!(forward.to, ota.id);
        assert_eq!(forward.kind, RelationshipKind::Father);
        assert_eq!(inverse.from, ota.id);
        assert_eq!(inverse.to, bola.id);
        // Bola's gender is unknown, so the way back is the neutral child
        assert_eq!(inverse.kind, RelationshipKind::Child);
    }

    #[test]
    fn test_edge_vocabulary_listing() {
        let vocab = edge_vocabulary();

        assert_eq!(vocab.len(), RelationshipKind::ALL.len());
        assert!(vocab.iter().all(|info| !info.label.is_empty()));
        assert!(vocab
            .iter()
            .any(|info| info.kind == RelationshipKind::MaternalUncle
                && info.label == "tog'am"
                && info.category == EdgeCategory::Extended));
    }
}
