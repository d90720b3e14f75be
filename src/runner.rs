//! Runner
//!
//! Ties focus tracking, menu loading and matching together behind the three
//! operations a search host calls: list actions, match a query, run a match.
//!
//! The loaded menu is cached between queries and dropped when the focused
//! application changes or its menu reports a change.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::error::{Result, ResultExt};
use crate::focus_tracker::FocusHandle;
use crate::logging;
use crate::matching::{MatchEngine, QueryMatch};
use crate::menu::{load_menu, ActionId, MenuChangeListener, MenuEntry, MenuSource, MenuTransport};

const CLICKED_EVENT: &str = "clicked";
const OPENED_EVENT: &str = "opened";
const CLOSED_EVENT: &str = "closed";

/// A secondary action offered for every match
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostAction {
    pub id: String,
    pub text: String,
    pub icon_name: String,
}

#[derive(Debug)]
enum MenuState {
    NoMenu,
    MenuLoaded {
        source: MenuSource,
        entries: Vec<MenuEntry>,
    },
}

pub struct Runner<T> {
    config: Config,
    focus: FocusHandle,
    transport: T,
    engine: MatchEngine,
    listener: MenuChangeListener,
    state: MenuState,
}

impl<T: MenuTransport> Runner<T> {
    pub fn new(config: Config, focus: FocusHandle, transport: T) -> Self {
        let engine = MatchEngine::new(config.min_query_chars);
        Self {
            config,
            focus,
            transport,
            engine,
            listener: MenuChangeListener::new(),
            state: MenuState::NoMenu,
        }
    }

    /// Menu items have no secondary actions.
    pub fn list_actions(&self) -> Vec<HostAction> {
        Vec::new()
    }

    /// Match `query` against the focused application's menu.
    ///
    /// Never fails: transport errors are logged and yield no results.
    #[instrument(skip(self))]
    pub fn match_query(&mut self, query: &str) -> Vec<QueryMatch> {
        let current = self.focus.current_menu_source();
        self.sync_source(current.as_ref());

        let Some(source) = current else {
            debug!("No menu for focused window");
            return Vec::new();
        };
        if matches!(self.state, MenuState::NoMenu) {
            self.load(source);
        }

        let MenuState::MenuLoaded { source, entries } = &self.state else {
            return Vec::new();
        };

        let mut matches = self
            .engine
            .match_entries(query, entries, &self.transport, source)
            .warn_on_err()
            .unwrap_or_default();

        matches.sort_by(|a, b| {
            b.relevance
                .total_cmp(&a.relevance)
                .then_with(|| b.match_kind.cmp(&a.match_kind))
        });
        matches.truncate(self.config.max_results);
        matches
    }

    /// Activate the menu item encoded in `match_id`.
    ///
    /// The id is decoded on its own, so it works even if the menu was
    /// reloaded since the match was produced. `_action_id` names a
    /// secondary action; there are none.
    #[instrument(skip(self))]
    pub fn run_action(&self, match_id: &str, _action_id: &str) -> Result<()> {
        let action: ActionId = match_id.parse()?;
        info!(source = %action.source, leaf = action.leaf, "Activating menu item");

        if self.config.emit_ancestor_events {
            self.send_to_ancestors(&action, OPENED_EVENT)?;
        }
        self.transport
            .send_event(&action.source, action.leaf, CLICKED_EVENT, "", 0)?;
        if self.config.emit_ancestor_events {
            self.send_to_ancestors(&action, CLOSED_EVENT)?;
        }
        Ok(())
    }

    fn send_to_ancestors(&self, action: &ActionId, event_id: &str) -> Result<()> {
        for &ancestor in &action.ancestors {
            self.transport
                .send_event(&action.source, ancestor, event_id, "", 0)?;
        }
        Ok(())
    }

    /// Drop the cached menu if focus moved or the menu reported a change
    fn sync_source(&mut self, current: Option<&MenuSource>) {
        let MenuState::MenuLoaded { source, .. } = &self.state else {
            return;
        };

        if current != Some(source) {
            info!(previous = %source, "Focused menu changed, dropping cached menu");
        } else if self.listener.take_dirty() {
            info!(source = %source, "Menu changed remotely, dropping cached menu");
        } else {
            return;
        }

        self.state = MenuState::NoMenu;
        self.listener.watch(None);
    }

    fn load(&mut self, source: MenuSource) {
        // Watch before fetching so a change during the load marks it dirty
        self.listener.watch(Some(source.clone()));

        let start = Instant::now();
        let loaded = load_menu(&self.transport, &source, &self.config.path_separator);
        logging::log_perf(
            "load_menu",
            start.elapsed().as_millis() as u64,
            self.config.slow_load_threshold_ms,
        );

        let Some(entries) = loaded.warn_on_err() else {
            return;
        };

        info!(source = %source, entry_count = entries.len(), "Loaded menu");
        self.transport
            .subscribe_changes(&source, self.listener.clone())
            .log_err();
        self.state = MenuState::MenuLoaded { source, entries };
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
