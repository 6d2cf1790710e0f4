use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};

use anyhow::Context;
use serde::Deserialize;
use uuid::Uuid;

use super::{LeaveStore, RequestScope, StorageError, WriterKey, WriterOp};
use crate::error::LeaveError;
use crate::model::entitlement::LeaveEntitlement;
use crate::model::leave_request::LeaveRequest;
use crate::model::user::User;

fn poisoned<T>(_: T) -> StorageError {
    StorageError::Unavailable {
        reason: "memory store lock poisoned".to_string(),
    }
}

/// Startup data for the in-memory store.
#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub entitlements: Vec<LeaveEntitlement>,
    #[serde(default)]
    pub requests: Vec<LeaveRequest>,
}

/// Process-local store. Data lives for the lifetime of the process.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<BTreeMap<u64, User>>,
    entitlements: RwLock<Vec<LeaveEntitlement>>,
    requests: RwLock<HashMap<Uuid, LeaveRequest>>,
    writers: Mutex<HashMap<WriterKey, Arc<Mutex<()>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: Seed) -> Self {
        MemoryStore {
            users: RwLock::new(seed.users.into_iter().map(|user| (user.id, user)).collect()),
            entitlements: RwLock::new(seed.entitlements),
            requests: RwLock::new(
                seed.requests
                    .into_iter()
                    .map(|request| (request.id, request))
                    .collect(),
            ),
            writers: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_seed_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading seed file {}", path.display()))?;
        let seed: Seed = serde_json::from_str(&raw)
            .with_context(|| format!("parsing seed file {}", path.display()))?;
        tracing::info!(
            users = seed.users.len(),
            entitlements = seed.entitlements.len(),
            requests = seed.requests.len(),
            "seeded memory store"
        );
        Ok(Self::from_seed(seed))
    }

    pub fn insert_user(&self, user: User) -> Result<(), StorageError> {
        self.users.write().map_err(poisoned)?.insert(user.id, user);
        Ok(())
    }

    pub fn insert_entitlement(&self, entitlement: LeaveEntitlement) -> Result<(), StorageError> {
        self.entitlements.write().map_err(poisoned)?.push(entitlement);
        Ok(())
    }

    fn writer_slot(&self, key: WriterKey) -> Result<Arc<Mutex<()>>, StorageError> {
        let mut writers = self.writers.lock().map_err(poisoned)?;
        Ok(writers.entry(key).or_default().clone())
    }
}

impl LeaveStore for MemoryStore {
    fn load_requests(&self, scope: RequestScope) -> Result<Vec<LeaveRequest>, StorageError> {
        let requests = self.requests.read().map_err(poisoned)?;
        let mut loaded: Vec<LeaveRequest> = requests
            .values()
            .filter(|request| match scope {
                RequestScope::Employee(id) => request.employee_id == id,
                RequestScope::All => true,
            })
            .cloned()
            .collect();
        loaded.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(loaded)
    }

    fn load_request(&self, id: Uuid) -> Result<Option<LeaveRequest>, StorageError> {
        Ok(self.requests.read().map_err(poisoned)?.get(&id).cloned())
    }

    fn load_entitlements(&self, employee_id: u64) -> Result<Vec<LeaveEntitlement>, StorageError> {
        Ok(self
            .entitlements
            .read()
            .map_err(poisoned)?
            .iter()
            .filter(|entitlement| entitlement.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn load_users(&self) -> Result<Vec<User>, StorageError> {
        Ok(self.users.read().map_err(poisoned)?.values().cloned().collect())
    }

    fn save_request(&self, request: &LeaveRequest) -> Result<(), StorageError> {
        self.requests
            .write()
            .map_err(poisoned)?
            .insert(request.id, request.clone());
        Ok(())
    }

    fn serialize_writer(&self, key: WriterKey, op: WriterOp<'_>) -> Result<LeaveRequest, LeaveError> {
        let slot = self.writer_slot(key)?;
        let _held = slot.lock().map_err(poisoned)?;
        op()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::leave_request::{LeaveStatus, LeaveType};
    use crate::model::role::Role;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn request(employee_id: u64, hour: u32) -> LeaveRequest {
        let day = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        LeaveRequest {
            id: Uuid::new_v4(),
            employee_id,
            leave_type: LeaveType::Paid,
            start_date: day,
            end_date: day,
            reason: "errand".to_string(),
            status: LeaveStatus::Pending,
            manager_comment: None,
            created_at: Utc.with_ymd_and_hms(2026, 8, 20, hour, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    #[test]
    fn loads_are_scoped_and_newest_first() {
        let store = MemoryStore::new();
        for (employee, hour) in [(1, 8), (2, 9), (1, 10)] {
            store.save_request(&request(employee, hour)).unwrap();
        }

        let own = store.load_requests(RequestScope::Employee(1)).unwrap();
        assert_eq!(own.len(), 2);
        assert!(own[0].created_at > own[1].created_at);
        assert_eq!(store.load_requests(RequestScope::All).unwrap().len(), 3);
    }

    #[test]
    fn save_replaces_by_id() {
        let store = MemoryStore::new();
        let mut stored = request(1, 8);
        store.save_request(&stored).unwrap();
        stored.status = LeaveStatus::Approved;
        store.save_request(&stored).unwrap();

        let loaded = store.load_request(stored.id).unwrap().expect("present");
        assert_eq!(loaded.status, LeaveStatus::Approved);
        assert_eq!(store.load_requests(RequestScope::All).unwrap().len(), 1);
    }

    #[test]
    fn seed_parses_client_shaped_json() {
        let seed: Seed = serde_json::from_str(
            r#"{
                "users": [{"id": 1, "name": "Asha Rao", "role": "employee"}],
                "entitlements": [{"employeeId": 1, "leaveType": "sick", "totalDays": 10}]
            }"#,
        )
        .unwrap();
        let store = MemoryStore::from_seed(seed);

        assert_eq!(store.load_users().unwrap()[0].role, Role::Employee);
        assert_eq!(store.load_entitlements(1).unwrap()[0].total_days, 10);
        assert!(store.load_entitlements(2).unwrap().is_empty());
    }

    #[test]
    fn writer_op_result_is_passed_back() {
        let store = MemoryStore::new();
        let candidate = request(3, 8);
        let key = WriterKey::of(&candidate);

        let saved = store
            .serialize_writer(key, &mut || {
                store.save_request(&candidate)?;
                Ok(candidate.clone())
            })
            .unwrap();
        assert_eq!(saved.id, candidate.id);

        let err = store
            .serialize_writer(key, &mut || Err(LeaveError::validation("reason", "nope")))
            .unwrap_err();
        assert_eq!(err.field(), Some("reason"));
    }
}
