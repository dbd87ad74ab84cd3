//! Debounced suggestion requests.
//!
//! Search input arrives one keystroke at a time. [`SuggestionRequester`] holds
//! at most one pending query and a deadline; each new input replaces the query
//! and pushes the deadline out by the quiet period. The query is released by
//! [`SuggestionRequester::poll`] once the deadline has passed.
//!
//! The requester never reads the clock. Callers pass `now` in and use
//! [`SuggestionRequester::deadline`] to decide when to poll next.

use std::{ops::Add, time::Duration};

use chatline_proto::{OutboundFrame, SuggestionKind};

/// A search ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionQuery {
    /// Which directory to search.
    pub kind: SuggestionKind,
    /// Search text.
    pub search_string: String,
}

impl SuggestionQuery {
    /// The request frame for this query.
    pub fn into_frame(self) -> OutboundFrame {
        OutboundFrame::suggestion_request(self.kind, self.search_string)
    }
}

/// Coalesces rapid query changes into one request per quiet period.
#[derive(Debug, Clone)]
pub struct SuggestionRequester<I> {
    quiet_period: Duration,
    pending: Option<(SuggestionQuery, I)>,
}

impl<I> SuggestionRequester<I>
where
    I: Copy + Ord + Add<Duration, Output = I>,
{
    /// Create a requester with the given quiet period.
    pub fn new(quiet_period: Duration) -> Self {
        Self { quiet_period, pending: None }
    }

    /// The configured quiet period.
    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Record a query change at `now`.
    ///
    /// Replaces any pending query, whatever its kind, and returns the new
    /// deadline. Blank text cancels instead and returns `None`.
    pub fn schedule(&mut self, kind: SuggestionKind, text: &str, now: I) -> Option<I> {
        let search_string = text.trim();
        if search_string.is_empty() {
            self.cancel();
            return None;
        }

        let deadline = now + self.quiet_period;
        let query = SuggestionQuery { kind, search_string: search_string.to_string() };
        self.pending = Some((query, deadline));
        Some(deadline)
    }

    /// Drop the pending query, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// When the pending query fires. `None` if nothing is pending.
    pub fn deadline(&self) -> Option<I> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Release the pending query if its deadline has passed.
    pub fn poll(&mut self, now: I) -> Option<SuggestionQuery> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => {
                self.pending.take().map(|(query, _)| query)
            },
            _ => None,
        }
    }
}
