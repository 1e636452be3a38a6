// src/document/sync.rs
//! Runs repository calls on worker threads so the UI never blocks on I/O.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;

use log::debug;

use super::record::RegistryTable;
use super::repository::LayoutRepository;
use crate::error::LayoutError;
use crate::layout::FloorPlan;

/// A plan together with the registry snapshot it was reconciled against.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub plan: Option<FloorPlan>,
    pub tables: Vec<RegistryTable>,
}

/// Completed background request.
#[derive(Debug)]
pub enum SyncEvent {
    Loaded(Result<LoadOutcome, LayoutError>),
    Created(Result<LoadOutcome, LayoutError>),
    RegistryFetched(Result<Vec<RegistryTable>, LayoutError>),
    /// `revision` is the editor revision of the snapshot that was written.
    Saved {
        revision: u64,
        result: Result<(), LayoutError>,
    },
}

enum Message {
    Load { generation: u64, outcome: Result<LoadOutcome, LayoutError> },
    Event(SyncEvent),
}

pub struct LayoutSync {
    repository: Arc<LayoutRepository>,
    sender: Sender<Message>,
    receiver: Receiver<Message>,
    save_in_flight: Arc<AtomicBool>,
    load_generation: u64,
    pending: usize,
}

impl LayoutSync {
    pub fn new(repository: LayoutRepository) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            repository: Arc::new(repository),
            sender,
            receiver,
            save_in_flight: Arc::new(AtomicBool::new(false)),
            load_generation: 0,
            pending: 0,
        }
    }

    pub fn is_saving(&self) -> bool {
        self.save_in_flight.load(Ordering::Acquire)
    }

    /// Number of requests whose results have not been polled yet.
    pub fn pending(&self) -> usize {
        self.pending
    }

    fn spawn<F>(&mut self, job: F)
    where
        F: FnOnce(&LayoutRepository) -> Message + Send + 'static,
    {
        let repository = self.repository.clone();
        let sender = self.sender.clone();
        self.pending += 1;
        thread::spawn(move || {
            let message = job(&repository);
            // The receiver is gone only when the editor was dropped.
            let _ = sender.send(message);
        });
    }

    /// Starts loading the active plan. Any load still running is superseded.
    pub fn request_load(&mut self) {
        self.load_generation += 1;
        let generation = self.load_generation;
        self.spawn(move |repo| Message::Load {
            generation,
            outcome: repo
                .load_with_registry()
                .map(|(plan, tables)| LoadOutcome { plan, tables }),
        });
    }

    /// Creates and persists a new plan seeded from the current registry.
    /// Supersedes pending loads.
    pub fn request_create(&mut self, name: String) {
        self.load_generation += 1;
        self.spawn(move |repo| {
            let outcome = repo.registry_tables().and_then(|tables| {
                let plan = repo.create(&name, &tables)?;
                Ok(LoadOutcome {
                    plan: Some(plan),
                    tables,
                })
            });
            Message::Event(SyncEvent::Created(outcome))
        });
    }

    /// Fetches the registry table list.
    pub fn request_registry(&mut self) {
        self.spawn(|repo| Message::Event(SyncEvent::RegistryFetched(repo.registry_tables())));
    }

    /// Writes a snapshot of `plan` taken at editor revision `revision`.
    ///
    /// Rejected with [`LayoutError::SaveInFlight`] while an earlier save is
    /// still running.
    pub fn request_save(&mut self, plan: &FloorPlan, revision: u64) -> Result<(), LayoutError> {
        if self
            .save_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Save of revision {} suppressed, another save is in flight", revision);
            return Err(LayoutError::SaveInFlight);
        }
        let snapshot = plan.clone();
        let in_flight = self.save_in_flight.clone();
        self.spawn(move |repo| {
            let result = repo.save(&snapshot);
            in_flight.store(false, Ordering::Release);
            Message::Event(SyncEvent::Saved { revision, result })
        });
        Ok(())
    }

    /// Drains finished requests. Results of superseded loads are dropped.
    pub fn poll(&mut self) -> Vec<SyncEvent> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(message) => {
                    self.pending = self.pending.saturating_sub(1);
                    match message {
                        Message::Load { generation, outcome } => {
                            if generation == self.load_generation {
                                events.push(SyncEvent::Loaded(outcome));
                            } else {
                                debug!("Ignoring superseded load #{}", generation);
                            }
                        }
                        Message::Event(event) => events.push(event),
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }

    /// Blocks until every request has reported back or `timeout` elapses.
    #[cfg(test)]
    pub fn wait(&mut self, timeout: std::time::Duration) -> Vec<SyncEvent> {
        let deadline = std::time::Instant::now() + timeout;
        let mut events = Vec::new();
        while self.pending > 0 && std::time::Instant::now() < deadline {
            events.extend(self.poll());
            thread::sleep(std::time::Duration::from_millis(2));
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryStore;
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn sync_with(store: &Arc<MemoryStore>) -> LayoutSync {
        LayoutSync::new(LayoutRepository::new(store.clone(), store.clone()))
    }

    fn registry() -> Vec<RegistryTable> {
        vec![RegistryTable::new("T1", "1", 2), RegistryTable::new("T2", "2", 4)]
    }

    #[test]
    fn test_create_then_load() {
        let store = Arc::new(MemoryStore::new(registry()));
        let mut sync = sync_with(&store);
        sync.request_create("Main".into());
        let events = sync.wait(TIMEOUT);
        assert!(matches!(&events[..], [SyncEvent::Created(Ok(o))] if o.plan.is_some()));

        sync.request_load();
        let events = sync.wait(TIMEOUT);
        match &events[..] {
            [SyncEvent::Loaded(Ok(outcome))] => {
                assert_eq!(outcome.plan.as_ref().unwrap().tables.len(), 2);
                assert_eq!(outcome.tables.len(), 2);
            }
            other => panic!("unexpected events: {:?}", other),
        }
    }

    #[test]
    fn test_superseded_load_is_ignored() {
        let store = Arc::new(MemoryStore::new(registry()));
        let mut sync = sync_with(&store);
        sync.request_load();
        let deadline = std::time::Instant::now() + TIMEOUT;
        while store.list_count() == 0 && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        // The first load has read the two-table registry; the second sees three.
        let mut tables = registry();
        tables.push(RegistryTable::new("T3", "3", 6));
        store.set_tables(tables);
        sync.request_load();

        let events = sync.wait(TIMEOUT);
        match &events[..] {
            [SyncEvent::Loaded(Ok(outcome))] => assert_eq!(outcome.tables.len(), 3),
            other => panic!("unexpected events: {:?}", other),
        }
        assert_eq!(sync.pending(), 0);
    }

    #[test]
    fn test_second_save_rejected_while_in_flight() {
        let store = Arc::new(MemoryStore::new(registry()));
        let mut sync = sync_with(&store);
        let plan = FloorPlan::new("p", "Main", 800.0, 600.0);

        sync.save_in_flight.store(true, Ordering::Release);
        assert!(matches!(sync.request_save(&plan, 1), Err(LayoutError::SaveInFlight)));
        sync.save_in_flight.store(false, Ordering::Release);

        sync.request_save(&plan, 2).unwrap();
        let events = sync.wait(TIMEOUT);
        assert!(matches!(&events[..], [SyncEvent::Saved { revision: 2, result: Ok(()) }]));
        assert!(!sync.is_saving());
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_save_failure_is_reported() {
        let store = Arc::new(MemoryStore::new(registry()));
        store.fail_next("offline");
        let mut sync = sync_with(&store);
        sync.request_save(&FloorPlan::new("p", "Main", 800.0, 600.0), 3).unwrap();
        let events = sync.wait(TIMEOUT);
        assert!(matches!(&events[..], [SyncEvent::Saved { result: Err(_), .. }]));
        assert!(!sync.is_saving());
    }
}
