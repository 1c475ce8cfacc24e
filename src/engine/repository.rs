//! Storage seam for finished matches
//!
//! Durable persistence is an external collaborator. The engine only needs
//! one promise from it: a finished match record (with its ledger) is kept
//! somewhere it can be replayed from. Everything else the engine holds is
//! reconstructible from that record.

use std::sync::Mutex;

use ahash::AHashMap;

use crate::bout::Bout;
use crate::core::error::Result;
use crate::core::types::MatchId;

pub trait BoutRepository: Send + Sync {
    /// Persist the final record of a finished match
    fn archive(&self, bout: &Bout) -> Result<()>;
}

/// In-memory stand-in for the real storage collaborator
#[derive(Default)]
pub struct InMemoryRepository {
    archived: Mutex<AHashMap<MatchId, Bout>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: MatchId) -> Option<Bout> {
        self.archived
            .lock()
            .expect("archive lock poisoned")
            .get(&id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.archived.lock().expect("archive lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BoutRepository for InMemoryRepository {
    fn archive(&self, bout: &Bout) -> Result<()> {
        self.archived
            .lock()
            .expect("archive lock poisoned")
            .insert(bout.id(), bout.clone());
        Ok(())
    }
}
