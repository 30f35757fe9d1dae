//! Request-scoped seating operations.
//!
//! `SeatingService` wires the collaborators to the in-memory engine:
//!
//! ```text
//! load room ─► validate config ─► validate input ─► resolve students
//!           ─► load assignments ─► index ─► solver / validator
//!           ─► replace (delete + insert) ─► invalidate cache
//! ```
//!
//! Every failure happens before the replace call, so a rejected request
//! never writes. Cache invalidation failures are logged and ignored.
//!
//! Read-compute-replace is serialized per room within this process when
//! [`SeatingConfig::serialize_per_room`] is set. Writers in other processes
//! are not covered. Locks exist only for rooms that were found and only
//! while some request holds or waits for them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, instrument, warn};

use crate::config::SeatingConfig;
use crate::constraint::{find_conflicts, SeatConflict};
use crate::error::{Result, SeatingError};
use crate::models::{RoomAllocation, SeatAssignment, SeatingPlan, Student, TenantContext};
use crate::solver::{GreedySeater, SeatingStats};
use crate::store::{CacheInvalidator, SeatingStore};
use crate::validation::{check_constraints, check_structure, ensure_unique_students};

type RoomKey = (String, String);
type RoomLocks = StdMutex<HashMap<RoomKey, Arc<Mutex<()>>>>;

/// Holds a room lock. Drops the map entry when no other request wants it.
struct RoomGuard<'a> {
    locks: &'a RoomLocks,
    key: RoomKey,
    lock: Arc<Mutex<()>>,
    held: Option<OwnedMutexGuard<()>>,
}

impl Drop for RoomGuard<'_> {
    fn drop(&mut self) {
        self.held.take();
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the map, one here: nobody else is waiting.
        let ours = locks
            .get(&self.key)
            .is_some_and(|l| Arc::ptr_eq(l, &self.lock));
        if ours && Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.key);
        }
    }
}

/// Seating operations over a store and a cache.
pub struct SeatingService<S, C> {
    store: S,
    cache: C,
    config: SeatingConfig,
    seater: GreedySeater,
    room_locks: RoomLocks,
}

impl<S, C> SeatingService<S, C>
where
    S: SeatingStore,
    C: CacheInvalidator,
{
    /// Creates a service.
    ///
    /// # Errors
    /// [`SeatingError::InvalidConfig`] if `config` does not validate.
    pub fn new(store: S, cache: C, config: SeatingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            cache,
            config,
            seater: GreedySeater::new(),
            room_locks: StdMutex::new(HashMap::new()),
        })
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The cache collaborator.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Active configuration.
    pub fn config(&self) -> &SeatingConfig {
        &self.config
    }

    /// Seats `student_ids` automatically, replacing their current seats.
    ///
    /// # Errors
    /// Configuration and input errors, [`SeatingError::Unsatisfiable`] when
    /// somebody cannot be seated (nothing is written), or store errors.
    #[instrument(
        skip(self, tenant, student_ids),
        fields(school = %tenant.school_id, room = %room_id, batch = student_ids.len())
    )]
    pub async fn auto_assign(
        &self,
        tenant: &TenantContext,
        room_id: &str,
        student_ids: &[String],
    ) -> Result<Vec<SeatAssignment>> {
        let room = self.load_room(tenant, room_id).await?;
        let _guard = self.room_guard(tenant, room_id).await;

        if student_ids.is_empty() {
            return Err(SeatingError::EmptyRequest);
        }
        ensure_unique_students(student_ids.iter().map(String::as_str))?;

        let students = self.resolve(tenant, student_ids).await?;
        let existing = self.store.load_assignments(tenant, room_id).await?;

        let placed = match self.seater.solve(&room, &existing, &students) {
            Ok(placed) => placed,
            Err(e) => {
                warn!(error = %e, "automatic seating rejected");
                return Err(e);
            }
        };

        self.commit(tenant, room_id, student_ids, &placed).await?;
        Ok(placed)
    }

    /// Applies caller-chosen seats after validating them.
    ///
    /// # Errors
    /// Configuration and input errors, [`SeatingError::ConstraintViolation`]
    /// for the first seat breaking the adjacency rule, or store errors.
    #[instrument(
        skip(self, tenant, seats),
        fields(school = %tenant.school_id, room = %room_id, batch = seats.len())
    )]
    pub async fn manual_assign(
        &self,
        tenant: &TenantContext,
        room_id: &str,
        seats: &[SeatAssignment],
    ) -> Result<Vec<SeatAssignment>> {
        let room = self.load_room(tenant, room_id).await?;
        let _guard = self.room_guard(tenant, room_id).await;

        if let Err(e) = check_structure(&room, seats) {
            warn!(error = %e, "manual seating rejected");
            return Err(e);
        }

        let student_ids: Vec<String> = seats.iter().map(|s| s.student_id.clone()).collect();
        let students = self.resolve(tenant, &student_ids).await?;
        let existing = self.store.load_assignments(tenant, room_id).await?;

        if let Err(e) = check_constraints(&room, &existing, &students, seats) {
            warn!(error = %e, "manual seating rejected");
            return Err(e);
        }

        self.commit(tenant, room_id, &student_ids, seats).await?;
        Ok(seats.to_vec())
    }

    /// Releases the seats of `student_ids`. Returns how many seats were freed.
    #[instrument(
        skip(self, tenant, student_ids),
        fields(school = %tenant.school_id, room = %room_id, batch = student_ids.len())
    )]
    pub async fn unassign(
        &self,
        tenant: &TenantContext,
        room_id: &str,
        student_ids: &[String],
    ) -> Result<usize> {
        self.load_room(tenant, room_id).await?;
        let _guard = self.room_guard(tenant, room_id).await;

        if student_ids.is_empty() {
            return Err(SeatingError::EmptyRequest);
        }
        ensure_unique_students(student_ids.iter().map(String::as_str))?;

        let existing = self.store.load_assignments(tenant, room_id).await?;
        let freed = existing
            .iter()
            .filter(|a| student_ids.contains(&a.student_id))
            .count();
        if freed == 0 {
            return Ok(0);
        }

        self.commit(tenant, room_id, student_ids, &[]).await?;
        Ok(freed)
    }

    /// Current seating plan of a room.
    pub async fn seating_plan(&self, tenant: &TenantContext, room_id: &str) -> Result<SeatingPlan> {
        let room = self.load_room(tenant, room_id).await?;
        let assignments = self.store.load_assignments(tenant, room_id).await?;
        Ok(SeatingPlan::new(room, assignments))
    }

    /// Rule violations present in the stored plan of a room.
    pub async fn audit(&self, tenant: &TenantContext, room_id: &str) -> Result<Vec<SeatConflict>> {
        let plan = self.seating_plan(tenant, room_id).await?;
        Ok(find_conflicts(&plan.room, &plan.assignments))
    }

    /// Occupancy statistics of a room.
    pub async fn stats(&self, tenant: &TenantContext, room_id: &str) -> Result<SeatingStats> {
        let plan = self.seating_plan(tenant, room_id).await?;
        Ok(SeatingStats::calculate(&plan))
    }

    async fn room_guard(&self, tenant: &TenantContext, room_id: &str) -> Option<RoomGuard<'_>> {
        if !self.config.serialize_per_room {
            return None;
        }
        let key = (tenant.school_id.clone(), room_id.to_string());
        let lock = self
            .room_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.clone())
            .or_default()
            .clone();
        let mut guard = RoomGuard {
            locks: &self.room_locks,
            key,
            lock,
            held: None,
        };
        guard.held = Some(Arc::clone(&guard.lock).lock_owned().await);
        Some(guard)
    }

    async fn load_room(&self, tenant: &TenantContext, room_id: &str) -> Result<RoomAllocation> {
        let room = self
            .store
            .load_room(tenant, room_id)
            .await?
            .ok_or_else(|| SeatingError::RoomNotFound {
                room_id: room_id.to_string(),
                school_id: tenant.school_id.clone(),
            })?;
        if let Err(e) = room.validate(&self.config) {
            warn!(error = %e, "room configuration rejected");
            return Err(e);
        }
        Ok(room)
    }

    /// Resolves ids to students, in input order. Fails listing every id
    /// that does not belong to the tenant.
    async fn resolve(&self, tenant: &TenantContext, student_ids: &[String]) -> Result<Vec<Student>> {
        let found = self.store.resolve_students(tenant, student_ids).await?;
        let mut by_id: HashMap<String, Student> =
            found.into_iter().map(|s| (s.id.clone(), s)).collect();

        let mut students = Vec::with_capacity(student_ids.len());
        let mut missing = Vec::new();
        for id in student_ids {
            match by_id.remove(id) {
                Some(s) => students.push(s),
                None => missing.push(id.clone()),
            }
        }
        if !missing.is_empty() {
            warn!(missing = missing.len(), "unknown students in request");
            return Err(SeatingError::UnknownStudents {
                student_ids: missing,
            });
        }
        Ok(students)
    }

    async fn commit(
        &self,
        tenant: &TenantContext,
        room_id: &str,
        remove: &[String],
        insert: &[SeatAssignment],
    ) -> Result<()> {
        self.store
            .replace_assignments(tenant, room_id, remove, insert)
            .await?;
        info!(removed = remove.len(), inserted = insert.len(), "seating committed");

        if let Err(e) = self.cache.invalidate(tenant, room_id).await {
            warn!(error = %e, "cache invalidation failed");
        }
        Ok(())
    }
}
