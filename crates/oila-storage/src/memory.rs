//! In-memory storage backend
//!
//! Useful for testing and single-process deployments. The whole
//! household lives behind one RwLock: every snapshot is taken under one
//! read guard and every mutation applies under one write guard, so
//! multi-collection writes are atomic with respect to readers.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use oila_core::{
    ChildLink, Household, HouseholdStore, PartnerLink, Person, PersonId, RelationshipEdge,
    RelationshipKind, Result, Union, UnionId, UnionStatus,
};

use crate::error::StorageError;

/// In-memory storage backend
pub struct MemoryStore {
    state: RwLock<Household>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(Household::new()),
        }
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, Household>> {
        Ok(self
            .state
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?)
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, Household>> {
        Ok(self
            .state
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HouseholdStore for MemoryStore {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.state.read().is_ok())
    }

    async fn snapshot(&self) -> Result<Household> {
        let state = self.read_state()?;
        Ok(state.clone())
    }

    async fn save_person(&self, person: &Person) -> Result<()> {
        let mut state = self.write_state()?;
        state.insert_person(person.clone());
        Ok(())
    }

    async fn insert_union(&self, union: &Union, partners: &[PartnerLink]) -> Result<()> {
        let mut state = self.write_state()?;
        state.insert_union(union.clone());
        for link in partners {
            state.insert_partner(*link);
        }
        Ok(())
    }

    async fn insert_partner(&self, link: &PartnerLink) -> Result<()> {
        let mut state = self.write_state()?;
        state.insert_partner(*link);
        Ok(())
    }

    async fn delete_partner(&self, union_id: UnionId, person: PersonId) -> Result<()> {
        let mut state = self.write_state()?;
        state.remove_partner(union_id, person);
        Ok(())
    }

    async fn set_union_status(
        &self,
        union_id: UnionId,
        status: UnionStatus,
        ended_on: Option<NaiveDate>,
    ) -> Result<()> {
        let mut state = self.write_state()?;
        state.set_union_status(union_id, status, ended_on);
        Ok(())
    }

    async fn insert_child(&self, link: &ChildLink) -> Result<()> {
        let mut state = self.write_state()?;
        state.insert_child(*link);
        Ok(())
    }

    async fn delete_child(&self, union_id: UnionId, person: PersonId) -> Result<()> {
        let mut state = self.write_state()?;
        state.remove_child(union_id, person);
        Ok(())
    }

    async fn insert_edge_pair(
        &self,
        forward: &RelationshipEdge,
        inverse: &RelationshipEdge,
    ) -> Result<()> {
        let mut state = self.write_state()?;
        state.insert_edge(forward.clone());
        state.insert_edge(inverse.clone());
        Ok(())
    }

    async fn delete_edge_pair(
        &self,
        from: PersonId,
        to: PersonId,
        kind: RelationshipKind,
        reciprocals: &[RelationshipKind],
    ) -> Result<()> {
        let mut state = self.write_state()?;
        state.remove_edge_pair(from, to, kind, reciprocals);
        Ok(())
    }
}
