//! Menu transport seam
//!
//! The remote menu protocol is reached through `MenuTransport`. Calls are
//! synchronous; timeouts and connection failures surface as
//! `TransportError`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

use super::types::{MenuLayout, MenuSource};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("{method} failed: {message}")]
    Call { method: String, message: String },

    #[error("menu service unavailable: {0}")]
    Disconnected(String),

    #[error("malformed reply: {0}")]
    Malformed(String),
}

/// Remote menu change notifications that invalidate a loaded menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSignal {
    LayoutUpdated,
    ItemsPropertiesUpdated,
}

/// Remote menu protocol operations.
pub trait MenuTransport {
    /// Fetch the layout below `parent_id`. A `recursion_depth` of -1 means
    /// the whole subtree.
    fn get_layout(
        &self,
        source: &MenuSource,
        parent_id: i32,
        recursion_depth: i32,
        property_names: &[&str],
    ) -> Result<MenuLayout, TransportError>;

    /// Tell the application a submenu is about to be shown. Some
    /// applications only populate children in response to this.
    fn about_to_show(&self, source: &MenuSource, id: i32) -> Result<bool, TransportError>;

    fn send_event(
        &self,
        source: &MenuSource,
        id: i32,
        event_id: &str,
        data: &str,
        timestamp: u32,
    ) -> Result<(), TransportError>;

    /// Route layout and property change signals of `source` to `listener`.
    /// Called after every successful load; subscribing the same source twice
    /// must not duplicate deliveries. The listener drops signals for menus
    /// it no longer watches.
    fn subscribe_changes(
        &self,
        source: &MenuSource,
        listener: MenuChangeListener,
    ) -> Result<(), TransportError>;
}

impl<T: MenuTransport + ?Sized> MenuTransport for Arc<T> {
    fn get_layout(
        &self,
        source: &MenuSource,
        parent_id: i32,
        recursion_depth: i32,
        property_names: &[&str],
    ) -> Result<MenuLayout, TransportError> {
        (**self).get_layout(source, parent_id, recursion_depth, property_names)
    }

    fn about_to_show(&self, source: &MenuSource, id: i32) -> Result<bool, TransportError> {
        (**self).about_to_show(source, id)
    }

    fn send_event(
        &self,
        source: &MenuSource,
        id: i32,
        event_id: &str,
        data: &str,
        timestamp: u32,
    ) -> Result<(), TransportError> {
        (**self).send_event(source, id, event_id, data, timestamp)
    }

    fn subscribe_changes(
        &self,
        source: &MenuSource,
        listener: MenuChangeListener,
    ) -> Result<(), TransportError> {
        (**self).subscribe_changes(source, listener)
    }
}

/// Receives menu change signals, possibly on a transport thread, and marks
/// the watched menu dirty.
///
/// Signals for any menu other than the one currently watched are dropped,
/// so a late signal from the previously focused application can't
/// invalidate the new one.
#[derive(Debug, Clone, Default)]
pub struct MenuChangeListener {
    watched: Arc<Mutex<Option<MenuSource>>>,
    dirty: Arc<AtomicBool>,
}

impl MenuChangeListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to a new menu and forget pending changes of the old one
    pub(crate) fn watch(&self, source: Option<MenuSource>) {
        let mut watched = self.watched.lock();
        *watched = source;
        self.dirty.store(false, Ordering::SeqCst);
    }

    /// Returns true if the signal concerned the watched menu
    pub fn on_menu_signal(&self, sender: &str, path: &str, signal: MenuSignal) -> bool {
        let watched = self.watched.lock();
        let relevant = watched
            .as_ref()
            .is_some_and(|source| source.matches(sender, path));
        if relevant {
            debug!(?signal, sender, path, "Watched menu changed");
            self.dirty.store(true, Ordering::SeqCst);
        }
        relevant
    }

    /// Returns whether a change arrived since the last call, and clears it
    pub(crate) fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::SeqCst)
    }
}
