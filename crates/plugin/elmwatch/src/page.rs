//! Page host
//!
//! Owns a document, its path watcher and the event loop, and drives the two
//! kinds of triggers: mutation batches and timers. Only one runs at a time.

use std::time::Duration;

use elmwatch_dom::{Document, NodeId};
use elmwatch_html::HtmlError;

use crate::error::WatchResult;
use crate::event_loop::{EventLoop, TimerTask};
use crate::future::ElementFuture;
use crate::query::Path;
use crate::watcher::{PathWatcher, StuckRequest, WaitConfig, WatcherConfig};

/// A document together with the machinery that watches it
#[derive(Debug)]
pub struct Page {
    document: Document,
    watcher: PathWatcher,
    event_loop: EventLoop,
}

impl Page {
    pub fn new(document: Document) -> Self {
        Self::with_config(document, WatcherConfig::default())
    }

    pub fn with_config(document: Document, config: WatcherConfig) -> Self {
        Self {
            document,
            watcher: PathWatcher::with_config(config),
            event_loop: EventLoop::new(),
        }
    }

    /// Load a page from HTML
    pub fn from_html(html: &str) -> Result<Self, HtmlError> {
        Ok(Self::new(elmwatch_html::parse(html)?))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Direct document access. Changes made here are dispatched on the next
    /// [`flush_mutations`](Self::flush_mutations).
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn watcher(&self) -> &PathWatcher {
        &self.watcher
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.event_loop.current_time()
    }

    /// See [`PathWatcher::wait_for_elm`]
    pub fn wait_for_elm(
        &mut self,
        queries: impl Into<Path>,
        config: WaitConfig,
    ) -> WatchResult<ElementFuture> {
        self.watcher
            .wait_for_elm(&mut self.document, &mut self.event_loop, queries, config)
    }

    /// See [`PathWatcher::disobserve`]
    pub fn disobserve(&mut self) {
        self.watcher.disobserve(&mut self.document);
    }

    /// Deliver queued mutation records as one batch. Returns whether the
    /// watcher ran a dispatch pass.
    pub fn flush_mutations(&mut self) -> bool {
        self.watcher.deliver_mutations(&mut self.document)
    }

    /// Run a batch of document changes, then flush
    pub fn mutate<R>(&mut self, f: impl FnOnce(&mut Document) -> R) -> R {
        let result = f(&mut self.document);
        self.flush_mutations();
        result
    }

    /// Parse `html` into `parent` and flush
    pub fn append_html(&mut self, parent: NodeId, html: &str) -> Result<Vec<NodeId>, HtmlError> {
        self.mutate(|doc| elmwatch_html::append_html(doc, parent, html))
    }

    /// Advance the clock by `delta`, firing due timers in order.
    /// Returns the stuck-request reports emitted on the way.
    pub fn advance(&mut self, delta: Duration) -> Vec<StuckRequest> {
        let deadline = self.event_loop.current_time() + delta;
        let mut reports = Vec::new();

        while let Some(task) = self.event_loop.next_due(deadline) {
            match task {
                TimerTask::Watchdog(id) => {
                    if let Some(report) = self.watcher.check_stuck(id, &self.document) {
                        self.event_loop
                            .set_timeout(task, self.watcher.config().watchdog_interval);
                        reports.push(report);
                    }
                }
            }
        }

        self.event_loop.advance_to(deadline);
        reports
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(Document::default())
    }
}
