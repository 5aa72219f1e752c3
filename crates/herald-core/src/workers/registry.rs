use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use super::Worker;
use crate::domain::WorkerKind;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate worker for kind={0}")]
    DuplicateWorker(WorkerKind),
}

/// Registry of workers (kind -> worker).
///
/// - Built during initialization (mutable).
/// - Used during runtime (immutable, shared behind `Arc`).
#[derive(Default)]
pub struct WorkerRegistry {
    workers: HashMap<WorkerKind, Arc<dyn Worker>>,
}

impl WorkerRegistry {
    pub fn new() -> Self {
        Self {
            workers: HashMap::new(),
        }
    }

    pub fn register(&mut self, worker: Arc<dyn Worker>) -> Result<(), RegistryError> {
        let kind = worker.kind();
        if self.workers.contains_key(&kind) {
            return Err(RegistryError::DuplicateWorker(kind));
        }
        self.workers.insert(kind, worker);
        Ok(())
    }

    pub fn get(&self, kind: WorkerKind) -> Option<&Arc<dyn Worker>> {
        self.workers.get(&kind)
    }

    pub fn contains(&self, kind: WorkerKind) -> bool {
        self.workers.contains_key(&kind)
    }

    /// Registered workers in [`WorkerKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Worker>> {
        WorkerKind::ALL
            .iter()
            .filter_map(|kind| self.workers.get(kind))
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workers::{LobbyistWorker, SimulationWorker};

    #[test]
    fn rejects_second_worker_for_same_kind() {
        let mut reg = WorkerRegistry::new();
        reg.register(Arc::new(SimulationWorker)).unwrap();

        let err = reg.register(Arc::new(SimulationWorker)).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateWorker(WorkerKind::Simulation)));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn iterates_in_canonical_order() {
        let mut reg = WorkerRegistry::new();
        reg.register(Arc::new(LobbyistWorker)).unwrap();
        reg.register(Arc::new(SimulationWorker)).unwrap();

        let kinds: Vec<_> = reg.iter().map(|w| w.kind()).collect();
        assert_eq!(kinds, vec![WorkerKind::Simulation, WorkerKind::Lobbyist]);
        assert!(reg.get(WorkerKind::Seo).is_none());
    }
}
