// ── Route table and router ──
//
// Static path -> view mapping for the dashboard, plus a router that builds
// views lazily, caches keep-alive ones, and produces the window title on
// every navigation.

use std::collections::HashMap;
use std::fmt;

use strum::{EnumIter, IntoEnumIterator};

/// Suffix appended to every window title.
pub const APP_NAME: &str = "SubsManager";

/// Title used when the matched route has none.
pub const UNKNOWN_TITLE: &str = "Unknown Page";

/// Route identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    Status,
    Subscription,
    NodeTest,
    NodeSelect,
    Settings,
    Logs,
    NotFound,
}

/// Views a route can render. Tab order follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum View {
    Status,
    Subscriptions,
    NodeTest,
    NodeSelect,
    Settings,
    Logs,
    NotFound,
}

impl View {
    /// Views reachable from the navigation bar (everything but not-found).
    pub fn navigable() -> impl Iterator<Item = View> {
        View::iter().filter(|v| *v != View::NotFound)
    }

    /// The route that renders this view.
    pub fn route(self) -> &'static Route {
        ROUTES
            .iter()
            .find(|r| r.view == self)
            .unwrap_or(&NOT_FOUND)
    }
}

/// One entry of the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub name: RouteName,
    pub view: View,
    pub title: Option<&'static str>,
    pub keep_alive: bool,
}

impl Route {
    /// Window title shown while this route is active.
    pub fn document_title(&self) -> String {
        format!("{} - {APP_NAME}", self.title.unwrap_or(UNKNOWN_TITLE))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title.unwrap_or(UNKNOWN_TITLE))
    }
}

const fn route(
    path: &'static str,
    name: RouteName,
    view: View,
    title: &'static str,
) -> Route {
    Route {
        path,
        name,
        view,
        title: Some(title),
        keep_alive: true,
    }
}

/// Every registered route. Order matches the navigation bar.
pub static ROUTES: [Route; 6] = [
    route("/", RouteName::Status, View::Status, "Status Monitor"),
    route("/subscription", RouteName::Subscription, View::Subscriptions, "Subscriptions"),
    route("/node-test", RouteName::NodeTest, View::NodeTest, "Node Test"),
    route("/node-select", RouteName::NodeSelect, View::NodeSelect, "Optimal Nodes"),
    route("/settings", RouteName::Settings, View::Settings, "Settings"),
    route("/logs", RouteName::Logs, View::Logs, "Logs"),
];

/// Catch-all for anything not in [`ROUTES`].
pub static NOT_FOUND: Route = Route {
    path: "*",
    name: RouteName::NotFound,
    view: View::NotFound,
    title: None,
    keep_alive: false,
};

/// Match a path against the route table.
///
/// A query string, a fragment and one trailing slash are ignored. Unknown
/// paths resolve to [`NOT_FOUND`].
pub fn resolve(path: &str) -> &'static Route {
    let normalized = normalize(path);
    ROUTES
        .iter()
        .find(|r| r.path == normalized)
        .unwrap_or(&NOT_FOUND)
}

fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    match path.strip_suffix('/') {
        Some("") => "/",
        Some(trimmed) => trimmed,
        None if path.is_empty() => "/",
        None => path,
    }
}

// ── Router ──────────────────────────────────────────────────────────

/// Result of a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: &'static Route,
    /// The path as requested (not normalized).
    pub path: String,
    /// Title produced by the navigation guard.
    pub title: String,
    /// Whether the view was constructed by this navigation.
    pub created: bool,
}

type ViewFactory<V> = Box<dyn FnMut(&'static Route) -> V>;

/// Navigation state plus lazily built views.
///
/// Keep-alive views are built on first visit and reused afterwards, so any
/// state they hold (selection, scroll offset) survives navigation. Other
/// views are rebuilt on every visit.
pub struct Router<V> {
    factory: ViewFactory<V>,
    current: Option<(&'static Route, String)>,
    previous: Option<String>,
    cached: HashMap<View, V>,
    transient: Option<V>,
    title: String,
}

impl<V> Router<V> {
    /// Create a router. No view is built until the first navigation.
    pub fn new(factory: impl FnMut(&'static Route) -> V + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            current: None,
            previous: None,
            cached: HashMap::new(),
            transient: None,
            title: APP_NAME.to_owned(),
        }
    }

    /// Navigate to `path`. Unknown paths show the not-found view.
    ///
    /// The title guard runs on every call, including repeat navigations to
    /// the current path, which otherwise change nothing.
    pub fn navigate(&mut self, path: &str) -> Navigation {
        let route = resolve(path);
        self.title = route.document_title();

        if let Some((current, current_path)) = &self.current {
            if *current_path == path {
                return Navigation {
                    route: *current,
                    path: path.to_owned(),
                    title: self.title.clone(),
                    created: false,
                };
            }
        }

        let created = if route.keep_alive {
            self.transient = None;
            if self.cached.contains_key(&route.view) {
                false
            } else {
                let view = (self.factory)(route);
                self.cached.insert(route.view, view);
                true
            }
        } else {
            self.transient = Some((self.factory)(route));
            true
        };

        if let Some((_, old_path)) = self.current.replace((route, path.to_owned())) {
            self.previous = Some(old_path);
        }

        Navigation {
            route,
            path: path.to_owned(),
            title: self.title.clone(),
            created,
        }
    }

    /// Return to the previous path, if any.
    pub fn back(&mut self) -> Option<Navigation> {
        let previous = self.previous.clone()?;
        Some(self.navigate(&previous))
    }

    /// The active route.
    pub fn current(&self) -> Option<&'static Route> {
        self.current.as_ref().map(|(route, _)| *route)
    }

    /// The active path as it was requested.
    pub fn current_path(&self) -> Option<&str> {
        self.current.as_ref().map(|(_, path)| path.as_str())
    }

    pub fn previous_path(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// The last title set by the navigation guard.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The active view, if a navigation has happened.
    pub fn view(&self) -> Option<&V> {
        let route = self.current()?;
        if route.keep_alive {
            self.cached.get(&route.view)
        } else {
            self.transient.as_ref()
        }
    }

    pub fn view_mut(&mut self) -> Option<&mut V> {
        let route = self.current()?;
        if route.keep_alive {
            self.cached.get_mut(&route.view)
        } else {
            self.transient.as_mut()
        }
    }

    /// Every view that is currently alive (cached plus the transient one).
    pub fn views_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.cached.values_mut().chain(self.transient.as_mut())
    }
}
