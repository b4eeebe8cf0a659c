//! Result handler adapters used by the dispatcher around the caller's handler.
//!
//! Each adapter forwards to the next one and passes a `false` from further
//! in straight back out, so a stop request always reaches the connector.

use super::ResultsHandler;
use crate::attribute::Uid;
use crate::filter::Filter;
use crate::object::ConnectorObject;
use log::trace;
use std::collections::HashSet;

/// Re-checks objects against the original filter.
///
/// Native queries may be wider than the filter; objects they let through
/// that the filter rejects are dropped here.
pub(crate) struct FilteringHandler<'a> {
    inner: &'a mut dyn ResultsHandler,
    filter: Option<&'a Filter>,
    rejected: usize,
}

impl<'a> FilteringHandler<'a> {
    pub(crate) fn new(inner: &'a mut dyn ResultsHandler, filter: Option<&'a Filter>) -> Self {
        Self {
            inner,
            filter,
            rejected: 0,
        }
    }

    pub(crate) fn rejected(&self) -> usize {
        self.rejected
    }
}

impl ResultsHandler for FilteringHandler<'_> {
    fn handle(&mut self, object: ConnectorObject) -> bool {
        if let Some(filter) = self.filter {
            if !filter.accept(&object) {
                trace!("Dropping {} rejected by {}", object.uid(), filter);
                self.rejected += 1;
                return true;
            }
        }
        self.inner.handle(object)
    }
}

/// Drops objects whose Uid was already delivered during this search.
pub(crate) struct DeduplicatingHandler<'a> {
    inner: &'a mut dyn ResultsHandler,
    seen: Option<HashSet<Uid>>,
}

impl<'a> DeduplicatingHandler<'a> {
    /// `enabled = false` makes the adapter a plain pass-through.
    pub(crate) fn new(inner: &'a mut dyn ResultsHandler, enabled: bool) -> Self {
        Self {
            inner,
            seen: enabled.then(HashSet::new),
        }
    }
}

impl ResultsHandler for DeduplicatingHandler<'_> {
    fn handle(&mut self, object: ConnectorObject) -> bool {
        if let Some(seen) = &mut self.seen {
            if !seen.insert(object.uid().clone()) {
                trace!("Dropping duplicate {}", object.uid());
                return true;
            }
        }
        self.inner.handle(object)
    }
}

/// Trims objects down to the requested attributes plus Uid and Name.
pub(crate) struct AttributesToGetHandler<'a> {
    inner: &'a mut dyn ResultsHandler,
    attributes: Option<Vec<String>>,
}

impl<'a> AttributesToGetHandler<'a> {
    pub(crate) fn new(inner: &'a mut dyn ResultsHandler, attributes: Option<Vec<String>>) -> Self {
        Self { inner, attributes }
    }
}

impl ResultsHandler for AttributesToGetHandler<'_> {
    fn handle(&mut self, object: ConnectorObject) -> bool {
        match &self.attributes {
            Some(keep) => self.inner.handle(object.retain_attributes(keep)),
            None => self.inner.handle(object),
        }
    }
}

/// Outermost adapter: counts deliveries and remembers a stop request.
pub(crate) struct StopTrackingHandler<'a> {
    inner: &'a mut dyn ResultsHandler,
    handled: usize,
    stopped: bool,
}

impl<'a> StopTrackingHandler<'a> {
    pub(crate) fn new(inner: &'a mut dyn ResultsHandler) -> Self {
        Self {
            inner,
            handled: 0,
            stopped: false,
        }
    }

    pub(crate) fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub(crate) fn handled(&self) -> usize {
        self.handled
    }
}

impl ResultsHandler for StopTrackingHandler<'_> {
    fn handle(&mut self, object: ConnectorObject) -> bool {
        // A connector that ignores a stop request gets nothing more through.
        if self.stopped {
            return false;
        }
        self.handled += 1;
        let keep_going = self.inner.handle(object);
        self.stopped = !keep_going;
        keep_going
    }
}
