//! Persistence and cache collaborators.
//!
//! The seating engine never talks to a database directly. It consumes a
//! [`SeatingStore`] (rooms, students, assignments) and a
//! [`CacheInvalidator`]. These are the only points where a request waits
//! on I/O.
//!
//! [`MemoryStore`] and [`RecordingInvalidator`] are in-process
//! implementations for tests and embedding.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::models::{RoomAllocation, SeatAssignment, Student, StoredAssignment, TenantContext};

/// Durable store of rooms, students and seat assignments.
#[async_trait]
pub trait SeatingStore: Send + Sync {
    /// Loads a room of the tenant. `None` if it does not exist there.
    async fn load_room(
        &self,
        tenant: &TenantContext,
        room_id: &str,
    ) -> Result<Option<RoomAllocation>, StoreError>;

    /// Loads all assignments of a room of the tenant, ordered by seat.
    /// Class ids are those of the tenant's students.
    async fn load_assignments(
        &self,
        tenant: &TenantContext,
        room_id: &str,
    ) -> Result<Vec<StoredAssignment>, StoreError>;

    /// Resolves student ids of the tenant. Ids that do not resolve are
    /// simply absent from the result.
    async fn resolve_students(
        &self,
        tenant: &TenantContext,
        student_ids: &[String],
    ) -> Result<Vec<Student>, StoreError>;

    /// Deletes the seats of `remove` and inserts `insert` in a room of the
    /// tenant, atomically.
    async fn replace_assignments(
        &self,
        tenant: &TenantContext,
        room_id: &str,
        remove: &[String],
        insert: &[SeatAssignment],
    ) -> Result<(), StoreError>;
}

/// Fire-and-forget cache invalidation hook.
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    /// Drops cached views of a room.
    async fn invalidate(&self, tenant: &TenantContext, room_id: &str) -> Result<(), StoreError>;
}

/// Invalidator that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInvalidator;

#[async_trait]
impl CacheInvalidator for NoopInvalidator {
    async fn invalidate(&self, _tenant: &TenantContext, _room_id: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Invalidator that records every call.
#[derive(Debug, Default)]
pub struct RecordingInvalidator {
    calls: Mutex<Vec<(String, String)>>,
    fail: AtomicBool,
}

impl RecordingInvalidator {
    /// Creates an invalidator that succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an invalidator whose calls fail (after being recorded).
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: AtomicBool::new(true),
        }
    }

    /// Recorded `(school_id, room_id)` pairs.
    pub async fn recorded(&self) -> Vec<(String, String)> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl CacheInvalidator for RecordingInvalidator {
    async fn invalidate(&self, tenant: &TenantContext, room_id: &str) -> Result<(), StoreError> {
        self.calls
            .lock()
            .await
            .push((tenant.school_id.clone(), room_id.to_string()));
        if self.fail.load(Ordering::Relaxed) {
            return Err(StoreError::new("cache unavailable"));
        }
        Ok(())
    }
}

/// In-memory [`SeatingStore`].
///
/// Every table is keyed by `(school_id, id)`, so two schools may use the
/// same room or student ids. Assignments keep only the student id; class ids
/// are joined from the same school's students on load, like a relational
/// store would.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rooms: Mutex<HashMap<ScopedKey, RoomAllocation>>,
    students: Mutex<HashMap<ScopedKey, Student>>,
    assignments: Mutex<HashMap<ScopedKey, Vec<SeatAssignment>>>,
    replace_calls: AtomicU64,
    fail_replace: AtomicBool,
}

type ScopedKey = (String, String);

fn scoped(tenant: &TenantContext, id: &str) -> ScopedKey {
    (tenant.school_id.clone(), id.to_string())
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a room for a school.
    pub async fn insert_room(&self, tenant: &TenantContext, room: RoomAllocation) {
        self.rooms
            .lock()
            .await
            .insert(scoped(tenant, &room.id), room);
    }

    /// Adds students for a school.
    pub async fn insert_students(&self, tenant: &TenantContext, students: Vec<Student>) {
        let mut table = self.students.lock().await;
        for s in students {
            table.insert(scoped(tenant, &s.id), s);
        }
    }

    /// Overwrites the assignments of a room without any checks.
    pub async fn seed_assignments(
        &self,
        tenant: &TenantContext,
        room_id: &str,
        rows: Vec<SeatAssignment>,
    ) {
        self.assignments
            .lock()
            .await
            .insert(scoped(tenant, room_id), rows);
    }

    /// Raw assignment rows of a room, ordered by seat.
    pub async fn rows(&self, tenant: &TenantContext, room_id: &str) -> Vec<SeatAssignment> {
        let mut rows = self
            .assignments
            .lock()
            .await
            .get(&scoped(tenant, room_id))
            .cloned()
            .unwrap_or_default();
        rows.sort_by_key(|r| r.coordinate);
        rows
    }

    /// Number of replace operations performed.
    pub fn replace_count(&self) -> u64 {
        self.replace_calls.load(Ordering::Relaxed)
    }

    /// Makes every following replace fail without writing.
    pub fn set_fail_replace(&self, fail: bool) {
        self.fail_replace.store(fail, Ordering::Relaxed);
    }
}

#[async_trait]
impl SeatingStore for MemoryStore {
    async fn load_room(
        &self,
        tenant: &TenantContext,
        room_id: &str,
    ) -> Result<Option<RoomAllocation>, StoreError> {
        Ok(self
            .rooms
            .lock()
            .await
            .get(&scoped(tenant, room_id))
            .cloned())
    }

    async fn load_assignments(
        &self,
        tenant: &TenantContext,
        room_id: &str,
    ) -> Result<Vec<StoredAssignment>, StoreError> {
        let rows = self.rows(tenant, room_id).await;
        let students = self.students.lock().await;
        Ok(rows
            .into_iter()
            .map(|r| {
                let class_id = students
                    .get(&scoped(tenant, &r.student_id))
                    .and_then(|s| s.class_id.clone());
                StoredAssignment::new(r.student_id, class_id, r.coordinate)
            })
            .collect())
    }

    async fn resolve_students(
        &self,
        tenant: &TenantContext,
        student_ids: &[String],
    ) -> Result<Vec<Student>, StoreError> {
        let students = self.students.lock().await;
        Ok(student_ids
            .iter()
            .filter_map(|id| students.get(&scoped(tenant, id)).cloned())
            .collect())
    }

    async fn replace_assignments(
        &self,
        tenant: &TenantContext,
        room_id: &str,
        remove: &[String],
        insert: &[SeatAssignment],
    ) -> Result<(), StoreError> {
        if self.fail_replace.load(Ordering::Relaxed) {
            return Err(StoreError::new("replace rejected"));
        }
        self.replace_calls.fetch_add(1, Ordering::Relaxed);

        let removed: HashSet<&str> = remove.iter().map(String::as_str).collect();
        let mut table = self.assignments.lock().await;
        let rows = table.entry(scoped(tenant, room_id)).or_default();
        rows.retain(|r| !removed.contains(r.student_id.as_str()));
        rows.extend(insert.iter().cloned());
        Ok(())
    }
}
