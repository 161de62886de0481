// Change tracking for widget state
//
// Widgets record which fields changed since the last refresh in a ChangeSet,
// and expose a Watchers registry so callers can observe individual fields.
// Everything here is synchronous: mutations mark fields, the widget's single
// refresh entry point drains the set, recomputes derived state, and notifies
// watchers before the mutating call returns. No timers, no threads, no locks.

/// Deduplicated record of changed field identifiers.
///
/// `F` is a widget-specific field enum (e.g. `PageField`). Marking the same
/// field twice between refreshes records it once.
#[derive(Debug, Clone)]
pub struct ChangeSet<F: Copy + PartialEq> {
    changed: Vec<F>,
}

impl<F: Copy + PartialEq> ChangeSet<F> {
    pub fn new() -> Self {
        Self {
            changed: Vec::new(),
        }
    }

    /// Record a field change (idempotent until the next drain)
    pub fn mark(&mut self, field: F) {
        if !self.changed.contains(&field) {
            self.changed.push(field);
        }
    }

    /// Whether any field changed since the last drain
    pub fn is_dirty(&self) -> bool {
        !self.changed.is_empty()
    }

    /// Whether a specific field changed since the last drain
    pub fn contains(&self, field: F) -> bool {
        self.changed.contains(&field)
    }

    /// Drain the set, returning changed fields in mark order
    pub fn take(&mut self) -> Vec<F> {
        std::mem::take(&mut self.changed)
    }
}

impl<F: Copy + PartialEq> Default for ChangeSet<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer callback invoked with the field that changed.
pub type WatchFn<F> = Box<dyn FnMut(F) + Send>;

/// Observer-list-per-field.
///
/// Callbacks are registered against a single field id and invoked
/// synchronously, in registration order, whenever the widget's refresh
/// drains a change for that field.
pub struct Watchers<F: Copy + PartialEq> {
    entries: Vec<(F, WatchFn<F>)>,
}

impl<F: Copy + PartialEq> Watchers<F> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a callback for a single field
    pub fn watch(&mut self, field: F, callback: impl FnMut(F) + Send + 'static) {
        self.entries.push((field, Box::new(callback)));
    }

    /// Notify watchers of one changed field
    pub fn notify(&mut self, field: F) {
        for (watched, callback) in &mut self.entries {
            if *watched == field {
                callback(field);
            }
        }
    }

    /// Notify watchers of a drained batch, preserving mark order
    pub fn notify_all(&mut self, fields: &[F]) {
        for field in fields {
            self.notify(*field);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<F: Copy + PartialEq> Default for Watchers<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Copy + PartialEq> std::fmt::Debug for Watchers<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watchers")
            .field("count", &self.entries.len())
            .finish()
    }
}
