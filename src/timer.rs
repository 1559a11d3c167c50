use std::time::Duration;

/// A one-shot timer carrying a payload, fired by the host's clock.
///
/// Time is whatever monotonic offset the host passes in; the timer never reads a clock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Timer<T> {
    pending: Option<(Duration, T)>,
}

impl<T> Default for Timer<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Timer<T> {
    /// Arms the timer to fire `delay` after `now`, replacing anything pending.
    pub(crate) fn schedule(&mut self, now: Duration, delay: Duration, payload: T) {
        self.pending = Some((now + delay, payload));
    }

    pub(crate) fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, payload)| payload)
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Takes the payload if the deadline has passed.
    pub(crate) fn fire(&mut self, now: Duration) -> Option<T> {
        match &self.pending {
            Some((due, _)) if *due <= now => self.cancel(),
            _ => None,
        }
    }
}
