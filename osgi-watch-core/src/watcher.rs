//! File watching and change classification.

use std::path::{Path, PathBuf};

use glob::Pattern;
use notify::Config as NotifyConfig;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::category::Category;
use crate::config::GlobConfig;
use crate::copy::{glob_base, match_options, rooted_pattern};
use crate::error::{Error, Result};

/// Maps changed paths to the artifact category whose watcher owns them.
#[derive(Debug, Clone)]
pub struct CategoryMatcher {
    entries: Vec<(Category, Pattern)>,
    es6: Pattern,
}

impl CategoryMatcher {
    /// Builds a matcher for `categories`, with globs rooted at `root`.
    pub fn new(root: &Path, globs: &GlobConfig, categories: &[Category]) -> Result<Self> {
        let entries = categories
            .iter()
            .map(|&category| Ok((category, rooted_pattern(root, globs.source_glob(category))?)))
            .collect::<Result<Vec<_>>>()?;
        let es6 = rooted_pattern(root, &globs.glob_es6)?;

        Ok(Self { entries, es6 })
    }

    /// The category a changed `path` belongs to.
    ///
    /// ES6 sources also match the plain JavaScript glob; they are claimed by
    /// the ES6 category only, so one change never triggers both rebuilds.
    pub fn classify(&self, path: &Path) -> Option<Category> {
        let is_es6 = self.es6.matches_path_with(path, match_options());

        self.entries
            .iter()
            .filter(|(category, _)| !(is_es6 && *category == Category::JavaScript))
            .find(|(_, pattern)| pattern.matches_path_with(path, match_options()))
            .map(|(category, _)| *category)
    }
}

/// Directories to watch for `categories`: the literal base of each source
/// glob, with nested duplicates removed.
///
/// A base that does not exist yet is replaced by its nearest existing
/// ancestor, so sources created during the session are still seen;
/// [`CategoryMatcher::classify`] filters out the unrelated events.
pub fn watch_roots(root: &Path, globs: &GlobConfig, categories: &[Category]) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = categories
        .iter()
        .filter_map(|&category| {
            let base = root.join(glob_base(globs.source_glob(category)));
            let existing = base.ancestors().find(|dir| dir.is_dir())?.to_path_buf();
            if existing != base {
                tracing::debug!(
                    "{} does not exist yet, watching {}",
                    base.display(),
                    existing.display()
                );
            }
            Some(existing)
        })
        .collect();
    dirs.sort();
    dirs.dedup();

    let mut roots: Vec<PathBuf> = Vec::new();
    for dir in dirs {
        if !roots.iter().any(|existing| dir.starts_with(existing)) {
            roots.push(dir);
        }
    }
    roots
}

pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    receiver: mpsc::UnboundedReceiver<notify::Result<Event>>,
}

impl FileWatcher {
    /// Starts watching each of `roots` recursively.
    pub fn new(roots: &[PathBuf]) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let notify_config = NotifyConfig::default();

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            notify_config,
        )
        .map_err(|e| Error::Watcher(format!("Failed to create watcher: {}", e)))?;

        for root in roots {
            watcher
                .watch(root, RecursiveMode::Recursive)
                .map_err(|e| {
                    Error::Watcher(format!("Failed to watch {}: {}", root.display(), e))
                })?;
            tracing::debug!("Watching {}", root.display());
        }

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
        })
    }

    /// Waits for the next event. Returns `None` once the watcher has shut
    /// down.
    pub async fn next_event(&mut self) -> Option<Result<Event>> {
        self.receiver
            .recv()
            .await
            .map(|res| res.map_err(|e| Error::Watcher(e.to_string())))
    }
}

/// Whether an event reflects a content change worth rebuilding for.
pub fn is_change(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Any | EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}
