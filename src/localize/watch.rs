//! Content watcher.
//!
//! Reports HTML files that appear or change under a content root so newly
//! inserted markup gets localized like the initial document.
//!
//! ```text
//! notify → classify (html only) → dedup queued events → ContentEvent
//! ```
//!
//! There is no debounce: every batch triggers a full pass per document.
//!
//! Writing a localized file back triggers one more event for it; the second
//! pass finds nothing to rewrite and the loop settles.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError};
use notify::event::ModifyKind;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;

use crate::utils::html::is_html_path;
use crate::{debug, log};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentEvent {
    /// An HTML file was created or its content changed.
    Inserted(PathBuf),
}

impl ContentEvent {
    pub fn path(&self) -> &Path {
        match self {
            Self::Inserted(path) => path,
        }
    }
}

/// Watches a content root for inserted HTML.
pub struct ContentWatcher {
    rx: Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    _watcher: RecommendedWatcher,
}

impl ContentWatcher {
    /// Start watching `root` recursively.
    ///
    /// Events buffer in the channel from this point on.
    pub fn new(root: &Path) -> notify::Result<Self> {
        let (tx, rx) = channel::unbounded();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(root, RecursiveMode::Recursive)?;

        Ok(Self {
            rx,
            _watcher: watcher,
        })
    }

    /// Wait up to `timeout` for a change, then take everything already queued.
    ///
    /// Returns an empty batch on timeout. `None` once the watcher is gone.
    pub fn next_batch(&self, timeout: Duration) -> Option<Vec<ContentEvent>> {
        let mut batch = Batch::default();

        match self.rx.recv_timeout(timeout) {
            Ok(res) => batch.add(res),
            Err(RecvTimeoutError::Timeout) => return Some(Vec::new()),
            Err(RecvTimeoutError::Disconnected) => return None,
        }
        for res in self.rx.try_iter() {
            batch.add(res);
        }

        Some(batch.events)
    }
}

/// Deduplicated events in arrival order.
#[derive(Default)]
struct Batch {
    seen: FxHashSet<PathBuf>,
    events: Vec<ContentEvent>,
}

impl Batch {
    fn add(&mut self, res: notify::Result<notify::Event>) {
        match res {
            Ok(event) => {
                for e in classify(&event) {
                    if self.seen.insert(e.path().to_path_buf()) {
                        self.events.push(e);
                    }
                }
            }
            Err(e) => log!("watch"; "notify error: {}", e),
        }
    }
}

/// Map a raw notify event to content events.
pub fn classify(event: &notify::Event) -> Vec<ContentEvent> {
    match event.kind {
        EventKind::Create(_) => {}
        // Metadata-only changes are mtime/chmod noise
        EventKind::Modify(ModifyKind::Metadata(_)) => return Vec::new(),
        EventKind::Modify(_) => {}
        _ => return Vec::new(),
    }

    debug!("watch"; "raw notify: {:?} {:?}", event.kind, event.paths);

    event
        .paths
        .iter()
        .filter(|p| is_html_path(p) && !is_temp_file(p))
        .map(|p| ContentEvent::Inserted(p.clone()))
        .collect()
}

/// Editor artifacts and hidden files.
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    name.ends_with('~') || name.starts_with('.')
}
