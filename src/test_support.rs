//! Fakes for the external collaborators, shared by unit tests.

use std::collections::{HashMap, HashSet, VecDeque};

use parking_lot::Mutex;

use crate::focus_tracker::{WindowClass, WindowError, WindowId, WindowPropertySource};
use crate::focus_tracker::{APPMENU_OBJECT_PATH_PROPERTY, APPMENU_SERVICE_PROPERTY};
use crate::menu::{
    MenuChangeListener, MenuLayout, MenuNode, MenuSignal, MenuSource, MenuTransport,
    TransportError,
};

/// File » New / Open, Quit
pub const FILE_MENU_JSON: &str = r#"{
    "id": 0,
    "children": [
        {
            "id": 1,
            "properties": {"label": "_File", "children-display": "submenu"},
            "children": [
                {"id": 2, "properties": {"label": "_New", "shortcut": [["Control", "n"]]}},
                {"id": 3, "properties": {"label": "_Open", "icon-name": "document-open"}}
            ]
        },
        {"id": 4, "properties": {"label": "_Quit", "icon-name": "application-exit"}}
    ]
}"#;

pub fn menu_from_json(json: &str) -> MenuNode {
    serde_json::from_str(json).expect("fixture menu should parse")
}

pub fn source(service: &str) -> MenuSource {
    MenuSource::new(service, "/MenuBar/1")
}

/// A call observed by `FakeTransport`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    GetLayout { parent: i32, depth: i32 },
    AboutToShow(i32),
    Event { id: i32, name: String },
}

#[derive(Default)]
struct FakeMenus {
    trees: HashMap<MenuSource, MenuNode>,
    /// Submenus whose children are only served when fetched directly
    lazy: HashSet<i32>,
    /// Lazy submenus that stay empty until `about_to_show`
    populate_on_show: HashSet<i32>,
    shown: HashSet<i32>,
    failing_parent: Option<i32>,
    failing_events: bool,
    revision: u32,
}

/// In-memory menu service serving JSON fixture trees.
#[derive(Default)]
pub struct FakeTransport {
    menus: Mutex<FakeMenus>,
    calls: Mutex<Vec<TransportCall>>,
    listener: Mutex<Option<MenuChangeListener>>,
    subscriptions: Mutex<Vec<MenuSource>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_menu(source: MenuSource, json: &str) -> Self {
        let transport = Self::new();
        transport.set_menu(source, json);
        transport
    }

    pub fn set_menu(&self, source: MenuSource, json: &str) {
        let mut menus = self.menus.lock();
        menus.trees.insert(source, menu_from_json(json));
        menus.revision += 1;
    }

    /// Serve `id`'s children only on a direct fetch
    pub fn make_lazy(&self, id: i32) {
        self.menus.lock().lazy.insert(id);
    }

    /// Like `make_lazy`, and children stay empty until `about_to_show(id)`
    pub fn populate_on_show(&self, id: i32) {
        let mut menus = self.menus.lock();
        menus.lazy.insert(id);
        menus.populate_on_show.insert(id);
    }

    pub fn set_enabled(&self, id: i32, enabled: bool) {
        let mut menus = self.menus.lock();
        for tree in menus.trees.values_mut() {
            if let Some(node) = find_node_mut(tree, id) {
                node.properties.enabled = Some(enabled);
            }
        }
    }

    /// Fail every `get_layout` for `parent`
    pub fn fail_layout_of(&self, parent: i32) {
        self.menus.lock().failing_parent = Some(parent);
    }

    pub fn fail_events(&self) {
        self.menus.lock().failing_events = true;
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn layout_fetches_of(&self, parent: i32) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, TransportCall::GetLayout { parent: p, .. } if *p == parent))
            .count()
    }

    pub fn subscriptions(&self) -> Vec<MenuSource> {
        self.subscriptions.lock().clone()
    }

    /// Deliver a change signal the way a bus connection would
    pub fn emit(&self, sender: &str, path: &str, signal: MenuSignal) -> bool {
        let listener = self.listener.lock().clone();
        listener.is_some_and(|l| l.on_menu_signal(sender, path, signal))
    }

    fn record(&self, call: TransportCall) {
        self.calls.lock().push(call);
    }
}

impl MenuTransport for FakeTransport {
    fn get_layout(
        &self,
        source: &MenuSource,
        parent_id: i32,
        recursion_depth: i32,
        _property_names: &[&str],
    ) -> Result<MenuLayout, TransportError> {
        self.record(TransportCall::GetLayout {
            parent: parent_id,
            depth: recursion_depth,
        });

        let menus = self.menus.lock();
        if menus.failing_parent == Some(parent_id) {
            return Err(TransportError::Call {
                method: "GetLayout".to_string(),
                message: "timeout".to_string(),
            });
        }
        let tree = menus
            .trees
            .get(source)
            .ok_or_else(|| TransportError::Disconnected(source.to_string()))?;
        let node = find_node(tree, parent_id).ok_or_else(|| TransportError::Call {
            method: "GetLayout".to_string(),
            message: format!("unknown id {}", parent_id),
        })?;

        let mut root = node.clone();
        if menus.populate_on_show.contains(&parent_id) && !menus.shown.contains(&parent_id) {
            root.children.clear();
        }
        for child in &mut root.children {
            prune(child, &menus, recursion_depth - 1);
        }

        Ok(MenuLayout {
            revision: menus.revision,
            root,
        })
    }

    fn about_to_show(&self, _source: &MenuSource, id: i32) -> Result<bool, TransportError> {
        self.record(TransportCall::AboutToShow(id));
        Ok(self.menus.lock().shown.insert(id))
    }

    fn send_event(
        &self,
        source: &MenuSource,
        id: i32,
        event_id: &str,
        _data: &str,
        _timestamp: u32,
    ) -> Result<(), TransportError> {
        self.record(TransportCall::Event {
            id,
            name: event_id.to_string(),
        });
        let menus = self.menus.lock();
        if menus.failing_events || !menus.trees.contains_key(source) {
            return Err(TransportError::Disconnected(source.to_string()));
        }
        Ok(())
    }

    fn subscribe_changes(
        &self,
        source: &MenuSource,
        listener: MenuChangeListener,
    ) -> Result<(), TransportError> {
        self.subscriptions.lock().push(source.clone());
        *self.listener.lock() = Some(listener);
        Ok(())
    }
}

/// Apply depth limits and lazy submenus to a served subtree
fn prune(node: &mut MenuNode, menus: &FakeMenus, remaining_depth: i32) {
    if remaining_depth == 0 || menus.lazy.contains(&node.id) {
        node.children.clear();
        return;
    }
    for child in &mut node.children {
        prune(child, menus, remaining_depth - 1);
    }
}

fn find_node(node: &MenuNode, id: i32) -> Option<&MenuNode> {
    if node.id == id {
        return Some(node);
    }
    node.children.iter().find_map(|child| find_node(child, id))
}

fn find_node_mut(node: &mut MenuNode, id: i32) -> Option<&mut MenuNode> {
    if node.id == id {
        return Some(node);
    }
    node.children
        .iter_mut()
        .find_map(|child| find_node_mut(child, id))
}

#[derive(Debug, Clone)]
pub enum WindowStep {
    /// Active window changes, then the notification is delivered
    Activate(Option<WindowId>),
    /// The wait itself fails with a protocol error
    WaitError,
    /// A notification arrives but the following active-window read fails
    ReadError,
}

#[derive(Debug, Clone, Default)]
pub struct FakeWindow {
    pub class: Option<WindowClass>,
    pub properties: HashMap<String, String>,
}

impl FakeWindow {
    pub fn app(class: &str, service: &str, path: &str) -> Self {
        let mut properties = HashMap::new();
        properties.insert(APPMENU_SERVICE_PROPERTY.to_string(), service.to_string());
        properties.insert(APPMENU_OBJECT_PATH_PROPERTY.to_string(), path.to_string());
        Self {
            class: Some(WindowClass::new(class, class)),
            properties,
        }
    }

    pub fn without_menu(class: &str) -> Self {
        Self {
            class: Some(WindowClass::new(class, class)),
            properties: HashMap::new(),
        }
    }
}

/// Scripted window property source. Once the script runs out, waiting
/// reports a lost connection so the tracker loop ends.
#[derive(Debug, Default)]
pub struct FakeWindowSource {
    pub active: Option<WindowId>,
    pub windows: HashMap<WindowId, FakeWindow>,
    pub script: VecDeque<WindowStep>,
    fail_next_read: bool,
}

impl FakeWindowSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(mut self, id: WindowId, window: FakeWindow) -> Self {
        self.windows.insert(id, window);
        self
    }

    pub fn active(mut self, id: Option<WindowId>) -> Self {
        self.active = id;
        self
    }

    pub fn then(mut self, step: WindowStep) -> Self {
        self.script.push_back(step);
        self
    }
}

impl WindowPropertySource for FakeWindowSource {
    fn active_window(&mut self) -> Result<Option<WindowId>, WindowError> {
        if std::mem::take(&mut self.fail_next_read) {
            return Err(WindowError::Protocol("BadWindow".to_string()));
        }
        Ok(self.active)
    }

    fn window_class(&mut self, window: WindowId) -> Result<Option<WindowClass>, WindowError> {
        match self.windows.get(&window) {
            Some(w) => Ok(w.class.clone()),
            None => Err(WindowError::Protocol(format!("BadWindow {}", window))),
        }
    }

    fn string_property(
        &mut self,
        window: WindowId,
        name: &str,
    ) -> Result<Option<String>, WindowError> {
        match self.windows.get(&window) {
            Some(w) => Ok(w.properties.get(name).cloned()),
            None => Err(WindowError::Protocol(format!("BadWindow {}", window))),
        }
    }

    fn wait_for_active_window_change(&mut self) -> Result<(), WindowError> {
        match self.script.pop_front() {
            Some(WindowStep::Activate(id)) => {
                self.active = id;
                Ok(())
            }
            Some(WindowStep::WaitError) => Err(WindowError::Protocol("BadAtom".to_string())),
            Some(WindowStep::ReadError) => {
                self.fail_next_read = true;
                Ok(())
            }
            None => Err(WindowError::Disconnected("script finished".to_string())),
        }
    }
}
