//! elmwatch
//!
//! Wait for elements that may not exist yet. A request names a path of
//! selector queries; each step is searched under the element found by the
//! previous one, starting from the document body or an explicit root.
//! Requests that cannot be resolved right away are re-evaluated whenever the
//! body subtree mutates, and resolve through an [`ElementFuture`].
//!
//! ```no_run
//! use elmwatch::{Page, WaitConfig};
//!
//! let mut page = Page::default();
//! let _item = page
//!     .wait_for_elm([".sidebar", ">.channel-item"], WaitConfig::new())
//!     .expect("valid selectors");
//! ```

mod error;
mod event_loop;
mod future;
mod page;
mod query;
mod resolver;
mod watcher;

pub use error::{WatchError, WatchResult};
pub use event_loop::{EventLoop, Scheduler, TimerId, TimerTask};
pub use future::{ElementFuture, WaitState};
pub use page::Page;
pub use query::{CompiledPath, CompiledQuery, CompiledSelector, Path, Query, RawQueries};
pub use resolver::{Walk, find_in_root, walk_path};
pub use watcher::{PathWatcher, RequestId, StuckRequest, WaitConfig, WatcherConfig};

pub use elmwatch_dom::{Document, NodeId};
