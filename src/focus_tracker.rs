//! Window Focus Tracker
//!
//! Tracks the menu source of the application that owns the focused window.
//! The search host's own window is ignored, so when the host pops up the
//! previously focused application is still the one being tracked.
//!
//! ## Architecture
//!
//! A background thread alternates between two steps:
//! - **Refresh**: read the active window and its appmenu properties, then
//!   publish the resulting `MenuSource` (or none)
//! - **Wait**: block until the active window changes
//!
//! Protocol errors are transient and only move the loop to its next step.
//! A lost connection ends the thread; the last published value stays
//! readable through every `FocusHandle`.
//!
//! ## Usage
//!
//! ```ignore
//! use appmenu_runner::focus_tracker::{ignore_window_classes, spawn_tracker};
//!
//! let focus = spawn_tracker(x11_source, ignore_window_classes(config.ignored_window_classes.clone()))?;
//!
//! if let Some(source) = focus.current_menu_source() {
//!     println!("Menu of focused app: {}", source);
//! }
//! ```

use std::io;
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, error, info, trace};

use crate::menu::MenuSource;

/// Window property naming the bus service that exports a window's menu
pub const APPMENU_SERVICE_PROPERTY: &str = "_KDE_NET_WM_APPMENU_SERVICE_NAME";
/// Window property naming the object path of a window's menu
pub const APPMENU_OBJECT_PATH_PROPERTY: &str = "_KDE_NET_WM_APPMENU_OBJECT_PATH";

const TRACKER_THREAD_NAME: &str = "focus-tracker";

pub type WindowId = u32;

/// The two halves of a window's class hint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowClass {
    pub instance: String,
    pub class: String,
}

impl WindowClass {
    pub fn new(instance: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            class: class.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// A request failed, e.g. the window vanished between two reads
    #[error("window protocol error: {0}")]
    Protocol(String),

    #[error("window system connection lost: {0}")]
    Disconnected(String),
}

/// Read access to the window system's focus state and window properties.
pub trait WindowPropertySource: Send {
    fn active_window(&mut self) -> Result<Option<WindowId>, WindowError>;

    fn window_class(&mut self, window: WindowId) -> Result<Option<WindowClass>, WindowError>;

    /// A UTF-8 string property of `window`, `None` when unset
    fn string_property(
        &mut self,
        window: WindowId,
        name: &str,
    ) -> Result<Option<String>, WindowError>;

    /// Block until the active window changes
    fn wait_for_active_window_change(&mut self) -> Result<(), WindowError>;
}

/// Decides whether activating a window leaves the tracked menu unchanged
pub type WindowPredicate = Box<dyn Fn(&WindowClass) -> bool + Send>;

/// Ignore windows whose instance or class name equals one of `classes`,
/// ignoring ASCII case.
pub fn ignore_window_classes(classes: Vec<String>) -> WindowPredicate {
    Box::new(move |window: &WindowClass| {
        classes.iter().any(|ignored| {
            ignored.eq_ignore_ascii_case(&window.instance)
                || ignored.eq_ignore_ascii_case(&window.class)
        })
    })
}

/// Shared, cheaply cloned view of the tracked menu source
#[derive(Debug, Clone, Default)]
pub struct FocusHandle {
    current: Arc<Mutex<Option<MenuSource>>>,
}

impl FocusHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The focused application's menu, if it exports one
    pub fn current_menu_source(&self) -> Option<MenuSource> {
        self.current.lock().clone()
    }

    pub(crate) fn publish(&self, source: Option<MenuSource>) {
        *self.current.lock() = source;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Refresh,
    Wait,
}

impl Step {
    fn next(self) -> Self {
        match self {
            Step::Refresh => Step::Wait,
            Step::Wait => Step::Refresh,
        }
    }
}

pub struct FocusTracker<S> {
    source: S,
    ignore: WindowPredicate,
    handle: FocusHandle,
    /// Outer `None` until the first successful read
    last_window: Option<Option<WindowId>>,
}

impl<S: WindowPropertySource> FocusTracker<S> {
    pub fn new(source: S, ignore: WindowPredicate) -> Self {
        Self {
            source,
            ignore,
            handle: FocusHandle::new(),
            last_window: None,
        }
    }

    pub fn handle(&self) -> FocusHandle {
        self.handle.clone()
    }

    /// Run the Refresh/Wait loop until the window system disconnects.
    pub fn run(mut self) {
        let mut step = Step::Refresh;
        loop {
            let result = match step {
                Step::Refresh => self.refresh(),
                Step::Wait => self.source.wait_for_active_window_change(),
            };

            match result {
                Ok(()) => {}
                Err(WindowError::Protocol(message)) => {
                    debug!(?step, %message, "Window protocol error, continuing");
                }
                Err(WindowError::Disconnected(message)) => {
                    error!(%message, "Window system disconnected, focus tracking stopped");
                    return;
                }
            }
            step = step.next();
        }
    }

    /// Re-read the active window and publish its menu source if it changed.
    pub fn refresh(&mut self) -> Result<(), WindowError> {
        let window = self.source.active_window()?;
        if self.last_window == Some(window) {
            trace!(?window, "Active window unchanged");
            return Ok(());
        }

        let Some(window) = window else {
            debug!("No active window");
            self.last_window = Some(None);
            self.handle.publish(None);
            return Ok(());
        };

        if let Some(class) = self.source.window_class(window)? {
            if (self.ignore)(&class) {
                debug!(window, class = %class.class, "Ignoring window, keeping previous menu");
                return Ok(());
            }
        }

        let menu_source = self.read_menu_source(window)?;
        info!(
            window,
            menu_source = ?menu_source.as_ref().map(ToString::to_string),
            "Focused window changed"
        );
        self.last_window = Some(Some(window));
        self.handle.publish(menu_source);
        Ok(())
    }

    /// Both appmenu properties are required; an empty value counts as unset.
    fn read_menu_source(&mut self, window: WindowId) -> Result<Option<MenuSource>, WindowError> {
        let service = self
            .source
            .string_property(window, APPMENU_SERVICE_PROPERTY)?
            .filter(|value| !value.is_empty());
        let object_path = self
            .source
            .string_property(window, APPMENU_OBJECT_PATH_PROPERTY)?
            .filter(|value| !value.is_empty());

        Ok(match (service, object_path) {
            (Some(service), Some(object_path)) => Some(MenuSource::new(service, object_path)),
            _ => None,
        })
    }
}

/// Start tracking on a named background thread that is never joined.
pub fn spawn_tracker<S>(source: S, ignore: WindowPredicate) -> io::Result<FocusHandle>
where
    S: WindowPropertySource + 'static,
{
    let tracker = FocusTracker::new(source, ignore);
    let handle = tracker.handle();

    thread::Builder::new()
        .name(TRACKER_THREAD_NAME.into())
        .spawn(move || tracker.run())?;

    info!("Focus tracker started");
    Ok(handle)
}

#[cfg(test)]
#[path = "focus_tracker_tests.rs"]
mod tests;
