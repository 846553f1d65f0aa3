//! Element futures
//!
//! The waiting side of a wait request. Resolution is delivered over a oneshot
//! channel; a request dropped without resolving (see
//! [`PathWatcher::disobserve`](crate::PathWatcher::disobserve)) leaves the
//! future pending forever.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use elmwatch_dom::NodeId;
use futures::channel::oneshot;

use crate::watcher::RequestId;

/// Where a wait stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState {
    Pending,
    Resolved(NodeId),
    /// The request was discarded and will never resolve
    Abandoned,
}

/// Future resolving to the element at the end of a path
#[derive(Debug)]
#[must_use = "the element is only delivered through the future"]
pub struct ElementFuture {
    id: RequestId,
    receiver: oneshot::Receiver<NodeId>,
    resolved: Option<NodeId>,
}

impl ElementFuture {
    pub(crate) fn new(id: RequestId, receiver: oneshot::Receiver<NodeId>) -> Self {
        Self {
            id,
            receiver,
            resolved: None,
        }
    }

    /// Id of the request backing this future
    pub fn request_id(&self) -> RequestId {
        self.id
    }

    /// Check the wait without blocking
    pub fn state(&mut self) -> WaitState {
        if let Some(node) = self.resolved {
            return WaitState::Resolved(node);
        }
        match self.receiver.try_recv() {
            Ok(Some(node)) => {
                self.resolved = Some(node);
                WaitState::Resolved(node)
            }
            Ok(None) => WaitState::Pending,
            Err(oneshot::Canceled) => WaitState::Abandoned,
        }
    }
}

impl Future for ElementFuture {
    type Output = NodeId;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<NodeId> {
        if let Some(node) = self.resolved {
            return Poll::Ready(node);
        }
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(node)) => {
                self.resolved = Some(node);
                Poll::Ready(node)
            }
            // Abandoned waits never complete
            Poll::Ready(Err(oneshot::Canceled)) | Poll::Pending => Poll::Pending,
        }
    }
}
