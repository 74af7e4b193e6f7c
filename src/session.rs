use crate::database::BlobStore;
use crate::dlog;
use crate::error::{StoreError, WorkoutError};
use crate::types::{Coords, IdClock, Workout};
use chrono::Local;

/// Key under which the whole collection is stored.
pub const STORE_KEY: &str = "workouts";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Insertion,
    DistanceDescending,
}

impl SortOrder {
    pub const fn by_distance(descending: bool) -> Self {
        if descending {
            Self::DistanceDescending
        } else {
            Self::Insertion
        }
    }
}

/// Where `add_or_replace` put the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Added(String),
    Replaced(String),
}

/// Read-only ordering of the collection for display.
///
/// Iterating does not consume the view, so it can be walked any number of
/// times.
#[derive(Debug, Clone)]
pub struct SortedView<'a> {
    items: Vec<&'a Workout>,
}

impl<'a> SortedView<'a> {
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'a Workout> + '_ {
        self.items.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Owns the ordered workout collection and everything that mutates it.
pub struct SessionManager<S> {
    workouts: Vec<Workout>,
    edit_target: Option<String>,
    ids: IdClock,
    store: S,
}

impl<S: BlobStore> SessionManager<S> {
    /// An empty session. Call [`SessionManager::restore`] to load saved data.
    pub fn new(store: S) -> Self {
        Self {
            workouts: Vec::new(),
            edit_target: None,
            ids: IdClock::default(),
            store,
        }
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Direct access to the backing store, bypassing the collection.
    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.workouts.iter().position(|w| w.id() == id)
    }

    /// Builds a new workout with a fresh id and the current time. The result
    /// is a draft: nothing is stored until it goes through `add_or_replace`.
    pub fn create(
        &mut self,
        kind: &str,
        coords: Coords,
        distance: f64,
        duration: f64,
        extra: f64,
    ) -> Result<Workout, WorkoutError> {
        let now = Local::now().fixed_offset();
        let mut id = self.ids.next_id(now);
        while self.position(&id).is_some() {
            id = self.ids.next_id(now);
        }
        Workout::create(kind, coords, distance, duration, extra, id, now)
    }

    /// Appends `draft`, or rewrites the edit target in place when one is set.
    ///
    /// An edit keeps the target's id, creation time, coordinates and position
    /// and takes distance, duration and the activity payload from `draft`.
    /// The edit target is cleared either way. The collection is persisted
    /// afterwards; a persistence failure leaves the in-memory change applied.
    pub fn add_or_replace(&mut self, draft: Workout) -> Result<Placement, WorkoutError> {
        let placement = match self.edit_target.take() {
            None => {
                let id = draft.id().to_string();
                tracing::info!(id = %id, kind = %draft.kind(), distance = draft.distance(), "workout added");
                self.workouts.push(draft);
                Placement::Added(id)
            }
            Some(target) => {
                let Some(existing) = self.workouts.iter_mut().find(|w| w.id() == target) else {
                    tracing::warn!(id = %target, "edit target vanished before the edit was applied");
                    return Err(WorkoutError::NotFound(target));
                };
                existing.rewrite(draft.distance(), draft.duration(), draft.activity().clone());
                existing.recompute();
                tracing::info!(id = %target, kind = %existing.kind(), distance = existing.distance(), "workout edited");
                Placement::Replaced(target)
            }
        };

        self.persist()?;
        Ok(placement)
    }

    /// Marks the workout with `id` as the target of the next `add_or_replace`
    /// and hands it back so the caller can pre-fill its form.
    pub fn begin_edit(&mut self, id: &str) -> Result<&Workout, WorkoutError> {
        let Some(idx) = self.position(id) else {
            self.edit_target = None;
            return Err(WorkoutError::NotFound(id.to_string()));
        };
        dlog!("edit_target id={id}");
        self.edit_target = Some(id.to_string());
        Ok(&self.workouts[idx])
    }

    pub fn cancel_edit(&mut self) {
        self.edit_target = None;
    }

    pub fn edit_target(&self) -> Option<&Workout> {
        self.edit_target.as_deref().and_then(|id| self.find(id))
    }

    /// Removes the workout with `id` and persists the shortened collection.
    ///
    /// Any list built from the old collection is stale afterwards and has to
    /// be rebuilt from scratch.
    pub fn delete(&mut self, id: &str) -> Result<Workout, WorkoutError> {
        let Some(idx) = self.position(id) else {
            return Err(WorkoutError::NotFound(id.to_string()));
        };

        let removed = self.workouts.remove(idx);
        if self.edit_target.as_deref() == Some(id) {
            self.edit_target = None;
        }
        tracing::info!(id = %id, remaining = self.workouts.len(), "workout deleted");

        self.persist()?;
        Ok(removed)
    }

    /// Presentation order over the stored collection. The stored order is
    /// never touched; ties in distance keep their insertion order.
    pub fn sorted_view(&self, order: SortOrder) -> SortedView<'_> {
        let mut items: Vec<&Workout> = self.workouts.iter().collect();
        if order == SortOrder::DistanceDescending {
            items.sort_by(|a, b| b.distance().total_cmp(&a.distance()));
        }
        SortedView { items }
    }

    /// Writes the whole collection to the store.
    pub fn persist(&mut self) -> Result<(), WorkoutError> {
        let blob = serde_json::to_string(&self.workouts).map_err(StoreError::from)?;
        self.store.set(STORE_KEY, &blob).inspect_err(|e| {
            tracing::warn!(err = %e, "failed to persist workouts; in-memory state kept");
        })?;
        dlog!("persisted workouts={} bytes={}", self.workouts.len(), blob.len());
        Ok(())
    }

    /// Replaces the collection with what the store holds.
    ///
    /// A missing or unreadable blob yields an empty collection without error.
    /// Records are trusted as stored; derived metrics are not recomputed.
    /// Only a failure to reach the store is reported.
    pub fn restore(&mut self) -> Result<usize, WorkoutError> {
        let blob = self.store.get(STORE_KEY)?;
        self.edit_target = None;

        self.workouts = match blob {
            None => {
                dlog!("restore: no saved workouts");
                Vec::new()
            }
            Some(blob) => match serde_json::from_str::<Vec<Workout>>(&blob) {
                Ok(workouts) => workouts,
                Err(e) => {
                    tracing::warn!(err = %e, "saved workouts are malformed; starting empty");
                    Vec::new()
                }
            },
        };

        tracing::info!(workouts = self.workouts.len(), "workouts restored");
        Ok(self.workouts.len())
    }

    /// Drops every workout, in memory and in the store.
    ///
    /// The store is emptied first; if that fails the collection is left as
    /// it was.
    pub fn clear_all(&mut self) -> Result<(), WorkoutError> {
        self.store.remove(STORE_KEY)?;
        let dropped = self.workouts.len();
        self.workouts.clear();
        self.edit_target = None;
        tracing::info!(dropped, "all workouts cleared");
        Ok(())
    }
}
