//! Ticketed snapshot holder that refuses out-of-order responses.

/// Sequence number of a dispatched fetch. Later dispatches compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    /// Raw sequence number, starting at 1.
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

/// Result of offering a response to a [`SyncView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The snapshot replaced the previous one.
    Applied,
    /// The response was current but identical to what is shown.
    Unchanged,
    /// A newer response was already applied; this one was dropped.
    Stale,
}

/// Latest applied snapshot of one polled resource.
///
/// # Examples
///
/// ```
/// use room_sync::{ApplyOutcome, SyncView};
///
/// let mut view = SyncView::new();
/// let slow = view.dispatch();
/// let fast = view.dispatch();
///
/// assert_eq!(view.apply(fast, vec!["a", "b"]), ApplyOutcome::Applied);
/// assert_eq!(view.apply(slow, vec!["a"]), ApplyOutcome::Stale);
/// assert_eq!(view.snapshot(), Some(&vec!["a", "b"]));
/// ```
#[derive(Debug)]
pub struct SyncView<T> {
    dispatched: u64,
    applied: Option<RequestTicket>,
    snapshot: Option<T>,
}

impl<T> Default for SyncView<T> {
    fn default() -> Self {
        Self {
            dispatched: 0,
            applied: None,
            snapshot: None,
        }
    }
}

impl<T: PartialEq> SyncView<T> {
    /// Empty view; nothing dispatched or applied.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the ticket for the next fetch.
    pub fn dispatch(&mut self) -> RequestTicket {
        self.dispatched = self.dispatched.saturating_add(1);
        RequestTicket(self.dispatched)
    }

    /// Offer the response for `ticket`.
    ///
    /// Responses at or below the last applied ticket are stale and leave the
    /// view untouched. A current response advances the applied ticket even
    /// when its snapshot matches the one already shown.
    pub fn apply(&mut self, ticket: RequestTicket, snapshot: T) -> ApplyOutcome {
        if self.applied.is_some_and(|last| ticket <= last) {
            return ApplyOutcome::Stale;
        }
        self.applied = Some(ticket);
        if self.snapshot.as_ref() == Some(&snapshot) {
            return ApplyOutcome::Unchanged;
        }
        self.snapshot = Some(snapshot);
        ApplyOutcome::Applied
    }

    /// Snapshot currently shown, if any response has been applied.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&T> {
        self.snapshot.as_ref()
    }

    /// Ticket of the last applied response.
    #[must_use]
    pub const fn last_applied(&self) -> Option<RequestTicket> {
        self.applied
    }
}
