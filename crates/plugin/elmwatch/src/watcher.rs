//! Path Watcher
//!
//! Keeps wait requests whose paths could not be resolved yet and re-walks
//! them whenever the body subtree mutates. The mutation observer only exists
//! while requests are pending.

use std::fmt;
use std::time::Duration;

use elmwatch_dom::{Document, MutationObserverInit, NodeId, ObserverId};
use futures::channel::oneshot;
use serde::{Deserialize, Serialize};

use crate::error::WatchResult;
use crate::event_loop::{Scheduler, TimerTask};
use crate::future::ElementFuture;
use crate::query::{CompiledPath, Path};
use crate::resolver::{Walk, walk_path};

/// Identifies a wait request within one watcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub(crate) u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request-{}", self.0)
    }
}

/// Watcher configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// Delay between "still pending" warnings for a request
    #[serde(rename = "watchdog_interval_ms", with = "millis")]
    pub watchdog_interval: Duration,

    /// Attribute changes that trigger a re-evaluation
    pub observed_attributes: Vec<String>,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            watchdog_interval: Duration::from_secs(10),
            observed_attributes: vec!["class".into(), "id".into()],
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis().try_into().unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

type StepCallback = Box<dyn FnMut(NodeId)>;

/// Per-request options
#[derive(Default)]
pub struct WaitConfig {
    on_step: Option<StepCallback>,
    root: Option<NodeId>,
}

impl WaitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once for every path step as it first resolves, in step order
    pub fn on_step(mut self, callback: impl FnMut(NodeId) + 'static) -> Self {
        self.on_step = Some(Box::new(callback));
        self
    }

    /// Resolve from `root` instead of the document body
    pub fn root(mut self, root: NodeId) -> Self {
        self.root = Some(root);
        self
    }
}

impl fmt::Debug for WaitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitConfig")
            .field("on_step", &self.on_step.is_some())
            .field("root", &self.root)
            .finish()
    }
}

/// A request the watchdog found still pending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StuckRequest {
    pub id: RequestId,
    pub path: Path,
    /// Effective root, e.g. `body` or `div#app.shell`
    pub root: String,
}

struct WaitRequest {
    id: RequestId,
    path: Path,
    steps: CompiledPath,
    config: WaitConfig,
    resolve: Option<oneshot::Sender<NodeId>>,
    /// Highest step index already reported to `on_step`
    last_notified: Option<usize>,
}

impl WaitRequest {
    fn effective_root(&self, doc: &Document) -> Option<NodeId> {
        self.config.root.or_else(|| doc.body())
    }

    /// Walk the path once; resolves the waiter and returns true when complete
    fn process(&mut self, doc: &Document) -> bool {
        let Some(root) = self.effective_root(doc) else {
            return false;
        };

        let id = self.id;
        let on_step = &mut self.config.on_step;
        let last_notified = &mut self.last_notified;
        let walk = walk_path(doc, root, &self.steps, |index, found| {
            if last_notified.is_some_and(|last| index <= last) {
                return;
            }
            tracing::trace!("{}: step {} found {}", id, index, found);
            if let Some(callback) = on_step.as_mut() {
                callback(found);
            }
            *last_notified = Some(index);
        });

        let Walk::Complete(element) = walk else {
            return false;
        };
        if let Some(sender) = self.resolve.take() {
            tracing::trace!("{} resolved to {}", self.id, element);
            if sender.send(element).is_err() {
                tracing::trace!("{}: waiter dropped before resolution", self.id);
            }
        }
        true
    }
}

/// Waits for elements along selector paths
pub struct PathWatcher {
    config: WatcherConfig,
    /// Pending requests in submission order
    pending: Vec<WaitRequest>,
    observer: Option<ObserverId>,
    next_request_id: u64,
}

impl PathWatcher {
    pub fn new() -> Self {
        Self::with_config(WatcherConfig::default())
    }

    pub fn with_config(config: WatcherConfig) -> Self {
        Self {
            config,
            pending: Vec::new(),
            observer: None,
            next_request_id: 0,
        }
    }

    pub fn config(&self) -> &WatcherConfig {
        &self.config
    }

    /// Wait for the element at the end of `queries`.
    ///
    /// The path is walked once right away; if it resolves, the returned future
    /// is already complete and nothing is registered. Otherwise the request is
    /// queued, the observer is started and a watchdog is scheduled.
    ///
    /// Fails only on invalid selectors, before anything is registered.
    pub fn wait_for_elm(
        &mut self,
        doc: &mut Document,
        scheduler: &mut impl Scheduler,
        queries: impl Into<Path>,
        config: WaitConfig,
    ) -> WatchResult<ElementFuture> {
        let path = queries.into();
        let steps = CompiledPath::compile(&path)?;

        let id = RequestId(self.next_request_id);
        self.next_request_id += 1;

        let (sender, receiver) = oneshot::channel();
        let mut request = WaitRequest {
            id,
            path,
            steps,
            config,
            resolve: Some(sender),
            last_notified: None,
        };

        if request.process(doc) {
            return Ok(ElementFuture::new(id, receiver));
        }

        tracing::trace!("{} pending for {}", id, request.path);
        self.pending.push(request);
        self.start_observer(doc);
        scheduler.schedule(TimerTask::Watchdog(id), self.config.watchdog_interval);

        Ok(ElementFuture::new(id, receiver))
    }

    /// Re-walk every pending request in submission order and drop the ones
    /// that resolved. Stops the observer once nothing is left.
    pub fn process_all(&mut self, doc: &mut Document) {
        self.pending.retain_mut(|request| !request.process(doc));
        if self.pending.is_empty() {
            self.stop_observer(doc);
        }
    }

    /// Take this watcher's queued mutation records and run one dispatch pass
    /// for the whole batch. Returns whether a pass ran.
    pub fn deliver_mutations(&mut self, doc: &mut Document) -> bool {
        let Some(observer) = self.observer else {
            return false;
        };
        let records = doc.take_records(observer);
        if records.is_empty() {
            return false;
        }
        tracing::trace!("Dispatching {} mutation records", records.len());
        self.process_all(doc);
        true
    }

    /// Drop every pending request without resolving it and stop observing
    pub fn disobserve(&mut self, doc: &mut Document) {
        if !self.pending.is_empty() {
            tracing::debug!("Discarding {} pending requests", self.pending.len());
        }
        self.pending.clear();
        self.stop_observer(doc);
    }

    /// One watchdog check: warns and returns a report while `id` is pending
    pub fn check_stuck(&self, id: RequestId, doc: &Document) -> Option<StuckRequest> {
        let request = self.pending.iter().find(|r| r.id == id)?;
        let root = request
            .effective_root(doc)
            .map(|root| doc.tree().describe(root))
            .unwrap_or_else(|| "<no root>".to_string());

        tracing::warn!(
            "The observer seems stuck looking for: {} at root: {}",
            request.path,
            root
        );
        Some(StuckRequest {
            id,
            path: request.path.clone(),
            root,
        })
    }

    /// Number of pending requests
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Check if `id` is still pending
    pub fn is_pending(&self, id: RequestId) -> bool {
        self.pending.iter().any(|r| r.id == id)
    }

    /// Check if the mutation observer is running
    pub fn is_observing(&self) -> bool {
        self.observer.is_some()
    }

    fn start_observer(&mut self, doc: &mut Document) {
        if self.observer.is_some() {
            return;
        }
        let Some(body) = doc.body() else {
            tracing::debug!("No body to observe yet");
            return;
        };

        let options = MutationObserverInit {
            child_list: true,
            subtree: true,
            attributes: true,
            attribute_filter: Some(self.config.observed_attributes.clone()),
            ..Default::default()
        };
        match doc.observe(body, options) {
            Ok(id) => self.observer = Some(id),
            Err(err) => tracing::warn!("Failed to observe body: {}", err),
        }
    }

    fn stop_observer(&mut self, doc: &mut Document) {
        if let Some(id) = self.observer.take() {
            doc.disconnect(id);
        }
    }
}

impl Default for PathWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PathWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathWatcher")
            .field("config", &self.config)
            .field("pending", &self.pending.iter().map(|r| r.id).collect::<Vec<_>>())
            .field("observer", &self.observer)
            .finish()
    }
}
