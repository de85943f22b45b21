//! Per-view loaded state.
//!
//! A view starts a load with [`ViewSlot::begin`] and hands the outcome back
//! with [`ViewSlot::settle`]. Only the newest load of a mounted view may
//! replace the value, and failures never do: the user has already been
//! notified by the gateway and keeps seeing the last good data.

use parking_lot::Mutex;

use crate::error::{ApiError, Outcome};

/// Identifies one load started by [`ViewSlot::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// What [`ViewSlot::settle`] did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Updated,
    /// Failed; the previous value is kept.
    Kept,
    /// Superseded by a newer load or arrived after unmount.
    Discarded,
}

#[derive(Debug)]
pub struct ViewSlot<T> {
    state: Mutex<SlotState<T>>,
}

#[derive(Debug)]
struct SlotState<T> {
    value: Option<T>,
    last_error: Option<ApiError>,
    latest: u64,
    in_flight: bool,
    mounted: bool,
}

impl<T> Default for ViewSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ViewSlot<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                value: None,
                last_error: None,
                latest: 0,
                in_flight: false,
                mounted: true,
            }),
        }
    }

    pub fn begin(&self) -> Ticket {
        let mut state = self.state.lock();
        state.latest += 1;
        state.in_flight = true;
        Ticket(state.latest)
    }

    pub fn settle(&self, ticket: Ticket, outcome: Outcome<T>) -> Settled {
        let mut state = self.state.lock();
        if !state.mounted || ticket.0 != state.latest {
            return Settled::Discarded;
        }
        state.in_flight = false;
        match outcome {
            Ok(value) => {
                state.value = Some(value);
                state.last_error = None;
                Settled::Updated
            }
            Err(e) => {
                state.last_error = Some(e);
                Settled::Kept
            }
        }
    }

    /// Marks the view gone; later outcomes are dropped.
    pub fn unmount(&self) {
        let mut state = self.state.lock();
        state.mounted = false;
        state.in_flight = false;
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().in_flight
    }

    pub fn last_error(&self) -> Option<ApiError> {
        self.state.lock().last_error.clone()
    }

    pub fn has_value(&self) -> bool {
        self.state.lock().value.is_some()
    }
}

impl<T: Clone> ViewSlot<T> {
    pub fn value(&self) -> Option<T> {
        self.state.lock().value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    #[test]
    fn failure_keeps_previous_value() {
        let slot = ViewSlot::new();
        let t = slot.begin();
        assert_eq!(slot.settle(t, Ok(3)), Settled::Updated);

        let t = slot.begin();
        assert!(slot.is_loading());
        let err = ApiError::new(FailureKind::Timeout, "slow");
        assert_eq!(slot.settle(t, Err(err)), Settled::Kept);
        assert_eq!(slot.value(), Some(3));
        assert_eq!(slot.last_error().map(|e| e.kind), Some(FailureKind::Timeout));
        assert!(!slot.is_loading());
    }

    #[test]
    fn older_load_cannot_overwrite_newer() {
        let slot = ViewSlot::new();
        let first = slot.begin();
        let second = slot.begin();
        assert_eq!(slot.settle(second, Ok("new")), Settled::Updated);
        assert_eq!(slot.settle(first, Ok("old")), Settled::Discarded);
        assert_eq!(slot.value(), Some("new"));
    }

    #[test]
    fn results_after_unmount_are_dropped() {
        let slot = ViewSlot::<u32>::new();
        let t = slot.begin();
        slot.unmount();
        assert_eq!(slot.settle(t, Ok(1)), Settled::Discarded);
        assert!(!slot.has_value());
    }
}
