//! Optimistic view state with ordered reloads.
//!
//! A view shows a value that may run ahead of the store: mutations patch it
//! immediately and a reload later replaces it with the authoritative copy.
//! Every change and every reload request takes a number from one counter.
//! A reload only lands if its number is higher than that of every change
//! already shown, so a reload issued before a newer patch (or before a newer
//! reload) cannot overwrite it when it resolves late.

#[derive(Debug, Clone)]
pub struct ViewState<T> {
    current: T,
    /// Last number handed out.
    issued: u64,
    /// Number of the change currently displayed.
    shown: u64,
}

/// Handle for undoing an optimistic patch.
#[derive(Debug, Clone)]
#[must_use = "keep the patch to roll it back if the mutation fails"]
pub struct OptimisticPatch<T> {
    generation: u64,
    previous: T,
}

impl<T> OptimisticPatch<T> {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadTicket {
    generation: u64,
}

impl ReloadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<T: Clone> ViewState<T> {
    pub fn new(initial: T) -> Self {
        Self {
            current: initial,
            issued: 0,
            shown: 0,
        }
    }

    pub fn current(&self) -> &T {
        &self.current
    }

    pub fn into_inner(self) -> T {
        self.current
    }

    pub fn generation(&self) -> u64 {
        self.shown
    }

    pub fn apply_optimistic(&mut self, patch: impl FnOnce(&mut T)) -> OptimisticPatch<T> {
        let previous = self.current.clone();
        patch(&mut self.current);
        self.issued += 1;
        self.shown = self.issued;
        OptimisticPatch {
            generation: self.shown,
            previous,
        }
    }

    /// Restores the value from before `patch`, unless something newer has
    /// been shown since. Returns whether the rollback happened.
    pub fn rollback(&mut self, patch: OptimisticPatch<T>) -> bool {
        if patch.generation != self.shown {
            tracing::debug!(
                patch = patch.generation,
                shown = self.shown,
                "Skipping rollback of superseded patch"
            );
            return false;
        }
        self.current = patch.previous;
        self.issued += 1;
        self.shown = self.issued;
        true
    }

    pub fn request_reload(&mut self) -> ReloadTicket {
        self.issued += 1;
        ReloadTicket {
            generation: self.issued,
        }
    }

    /// Replaces the shown value with a reload result if the reload is newer
    /// than everything shown so far. Returns whether it was applied.
    pub fn resolve_reload(&mut self, ticket: ReloadTicket, fresh: T) -> bool {
        if ticket.generation <= self.shown {
            tracing::debug!(
                ticket = ticket.generation,
                shown = self.shown,
                "Discarding stale reload"
            );
            return false;
        }
        self.current = fresh;
        self.shown = ticket.generation;
        true
    }
}
