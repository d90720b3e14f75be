//! Enablement lookups for matched entries.
//!
//! The loaded tree doesn't carry `enabled`. The parent group of a candidate
//! is asked for its children's flags at match time, once per parent per
//! pass.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::menu::{MenuEntry, MenuSource, MenuTransport, TransportError};

const ENABLED_PROPERTIES: &[&str] = &["enabled"];

/// Memoized enabled flags, valid for a single matching pass
pub struct EnablementCache<'a, T: ?Sized> {
    transport: &'a T,
    source: &'a MenuSource,
    enabled: HashMap<i32, bool>,
    fetched_parents: HashSet<i32>,
}

impl<'a, T: MenuTransport + ?Sized> EnablementCache<'a, T> {
    pub fn new(transport: &'a T, source: &'a MenuSource) -> Self {
        Self {
            transport,
            source,
            enabled: HashMap::new(),
            fetched_parents: HashSet::new(),
        }
    }

    /// Whether `entry` can currently be activated.
    ///
    /// Top-level entries are always enabled. An entry its parent no longer
    /// lists is stale and reported as disabled.
    pub fn is_enabled(&mut self, entry: &MenuEntry) -> Result<bool, TransportError> {
        let Some(parent) = entry.parent() else {
            return Ok(true);
        };

        if let Some(&enabled) = self.enabled.get(&entry.id) {
            return Ok(enabled);
        }

        if self.fetched_parents.insert(parent.id) {
            self.fetch_children(parent.id)?;
        }

        let enabled = *self.enabled.entry(entry.id).or_insert(false);
        Ok(enabled)
    }

    fn fetch_children(&mut self, parent_id: i32) -> Result<(), TransportError> {
        self.transport.about_to_show(self.source, parent_id)?;
        let layout = self
            .transport
            .get_layout(self.source, parent_id, 1, ENABLED_PROPERTIES)?;

        trace!(
            parent_id,
            child_count = layout.root.children.len(),
            "Fetched enabled flags"
        );
        for child in &layout.root.children {
            self.enabled.insert(child.id, child.properties.is_enabled());
        }
        Ok(())
    }
}
