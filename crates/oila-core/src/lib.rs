//! Oila Core - Kinship graph engine for family trees
//!
//! This crate provides the core data types, validation, traversal, and
//! kinship calculation for the Oila household system.

pub mod error;
pub mod household;
pub mod kinship;
pub mod limits;
pub mod lineage;
pub mod person;
pub mod relationship;
pub mod service;
pub mod traversal;
pub mod union;
pub mod validate;
pub mod vocabulary;

pub use error::{Error, Result};
pub use household::{Household, HouseholdStore};
pub use kinship::{AncestorEntry, Kinship, LabeledPerson};
pub use limits::{LimitError, DEFAULT_TREE_DEPTH, KIN_SPAN_CEILING, MAX_TREE_DEPTH};
pub use lineage::{ChildLink, Lineage, NewChild};
pub use person::{Gender, Person, PersonId};
pub use relationship::{
    EdgeCategory, EdgeId, EdgeKindInfo, RelationshipEdge, RelationshipKind,
};
pub use service::{FamilyService, LabeledTree};
pub use traversal::{TreeView, TreeWalker};
pub use union::{
    NewUnion, PartnerLink, PartnerSlot, Union, UnionId, UnionKind, UnionStatus, UnionView,
};
pub use validate::{Advisory, ValidationError};
pub use vocabulary::Side;
