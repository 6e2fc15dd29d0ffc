use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures_util::future::join_all;
use rand::Rng;

use crate::directory::{DirectoryClient, DirectoryError, NewUser, UserRecord};

/// Stable identity for a record in the store.
///
/// Server-confirmed records are keyed by their server id; records the server
/// echoed back without one get a client-generated key. Selection and removal
/// always go through keys, never through list positions, so they stay correct
/// while the list shifts underneath a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Server(i64),
    Local(u64),
}

/// Outcome of the most recent load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// A record plus its selection key.
#[derive(Debug, Clone)]
pub struct Entry {
    pub key: RecordKey,
    pub record: UserRecord,
}

#[derive(Debug, Default)]
struct StoreState {
    entries: Vec<Entry>,
    status: SyncStatus,
}

/// Point-in-time view of the store for consumers.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    pub entries: Vec<Entry>,
    pub status: SyncStatus,
}

/// Result of a batch removal.
///
/// The batch always runs to completion; per-record failures are reported
/// here instead of aborting the rest of the batch.
#[derive(Debug, Default)]
pub struct DeleteOutcome {
    pub removed: Vec<RecordKey>,
    pub failed: Vec<(RecordKey, DirectoryError)>,
}

impl DeleteOutcome {
    pub fn fully_applied(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Client-side state for the remote user directory.
///
/// Owns the current record list and the status of the last load, and keeps
/// them consistent with the remote through three operations: `refresh`,
/// `add`, and `remove`. Construct one per consumer and pass it around; there
/// is no global instance.
pub struct UserStore {
    client: DirectoryClient,
    state: Mutex<StoreState>,
    next_local_key: AtomicU64,
}

impl UserStore {
    pub fn new(client: DirectoryClient) -> Self {
        Self {
            client,
            state: Mutex::new(StoreState::default()),
            next_local_key: AtomicU64::new(0),
        }
    }

    // The lock is only held for plain field access, never across an await.
    fn lock_state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn key_for(&self, record: &UserRecord) -> RecordKey {
        match record.id {
            Some(id) => RecordKey::Server(id),
            None => RecordKey::Local(self.next_local_key.fetch_add(1, Ordering::Relaxed)),
        }
    }

    /// Current entries and status.
    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.lock_state();
        StoreSnapshot {
            entries: state.entries.clone(),
            status: state.status,
        }
    }

    /// Replace the store contents with the remote collection.
    ///
    /// Sets the status to `Pending` for the duration of the request. On
    /// success the entries are replaced wholesale; on failure the previous
    /// entries are kept and the status flips to `Failed`. The request runs
    /// without the state lock held, so of two concurrent refreshes the one
    /// completing last wins. Returns the number of records loaded.
    pub async fn refresh(&self) -> Result<usize, DirectoryError> {
        self.lock_state().status = SyncStatus::Pending;

        match self.client.list_users().await {
            Ok(records) => {
                let entries: Vec<Entry> = records
                    .into_iter()
                    .map(|record| {
                        let record = UserRecord {
                            amount: Some(random_amount()),
                            ..record
                        };
                        Entry {
                            key: self.key_for(&record),
                            record,
                        }
                    })
                    .collect();
                let count = entries.len();

                let mut state = self.lock_state();
                state.entries = entries;
                state.status = SyncStatus::Succeeded;
                Ok(count)
            }
            Err(err) => {
                self.lock_state().status = SyncStatus::Failed;
                Err(err)
            }
        }
    }

    /// Create a record remotely and append the confirmed result.
    ///
    /// There is no optimistic insert: on failure the error propagates and
    /// the entries are untouched. Load status is not affected.
    pub async fn add(&self, input: NewUser) -> Result<UserRecord, DirectoryError> {
        let input = NewUser {
            amount: input.amount.or_else(|| Some(random_amount())),
            ..input
        };

        let record = self.client.create_user(&input).await?;
        let entry = Entry {
            key: self.key_for(&record),
            record: record.clone(),
        };
        self.lock_state().entries.push(entry);
        Ok(record)
    }

    /// Remove the selected records, deleting server-confirmed ones remotely.
    ///
    /// Keys that no longer resolve to an entry are dropped silently. Remote
    /// deletes fan out concurrently with no ordering guarantee; local state
    /// is mutated once, after all of them settle, and a record leaves the
    /// list only if its remote delete confirmed. Records without a server id
    /// have nothing to delete remotely and are removed directly.
    pub async fn remove(&self, keys: &[RecordKey]) -> DeleteOutcome {
        let selected: Vec<RecordKey> = {
            let state = self.lock_state();
            keys.iter()
                .copied()
                .filter(|key| state.entries.iter().any(|entry| entry.key == *key))
                .collect()
        };

        let mut confirmed: Vec<RecordKey> = Vec::new();
        let mut requests = Vec::new();
        for key in selected {
            match key {
                RecordKey::Server(id) => {
                    let client = self.client.clone();
                    requests.push(async move { (key, client.delete_user(id).await) });
                }
                RecordKey::Local(_) => confirmed.push(key),
            }
        }

        let mut failed: Vec<(RecordKey, DirectoryError)> = Vec::new();
        for (key, result) in join_all(requests).await {
            match result {
                Ok(()) => confirmed.push(key),
                Err(err) => failed.push((key, err)),
            }
        }

        let mut state = self.lock_state();
        state.entries.retain(|entry| !confirmed.contains(&entry.key));
        DeleteOutcome {
            removed: confirmed,
            failed,
        }
    }
}

fn random_amount() -> u64 {
    rand::thread_rng().gen_range(1..=10_000)
}
