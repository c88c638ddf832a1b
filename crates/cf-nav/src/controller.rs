use std::collections::{BTreeMap, VecDeque};

use cf_core::{CaseFileError, TabKey, TransitionDirection};
use serde::Serialize;
use tracing::debug;

use crate::history::TabHistory;
use crate::input::{adjacent_tab, KeyChord, SwipeGesture};
use crate::ledger::NotificationLedger;
use crate::path_map::{path_to_tab, tab_to_path};
use crate::router::{MemoryRouter, NavigateOptions, Router};

/// Whether the controller is waiting for the router to echo navigations it
/// requested itself.
///
/// | state                  | event                         | next state                    |
/// |------------------------|-------------------------------|-------------------------------|
/// | `Idle`                 | `set_tab(t)`, t != current    | `Navigating [t]`              |
/// | `Navigating [..]`      | `set_tab(t)`, t != current    | `Navigating [.., t]`          |
/// | `Idle`                 | route change                  | `Idle` (applied if new tab)   |
/// | `Navigating [t, ..]`   | route change resolving to t   | pop t, `Idle` once empty      |
/// | `Navigating [t, ..]`   | route change resolving to u!=t| `Idle` (applied if new tab)   |
///
/// Echoes are absorbed without touching history, so a controller-initiated
/// navigation never loops back into another navigation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncState {
    #[default]
    Idle,
    Navigating { pending: VecDeque<TabKey> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The path resolved to the tab already shown.
    Unchanged,
    /// The path was the echo of a navigation this controller requested.
    Echo,
    /// An external navigation moved the dashboard to another tab.
    Applied(TabKey),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavSnapshot {
    pub current_tab: TabKey,
    pub transition_direction: TransitionDirection,
    pub history: Vec<TabKey>,
    pub notifications: BTreeMap<TabKey, u32>,
}

pub struct TabController<R: Router> {
    router: R,
    current: TabKey,
    direction: TransitionDirection,
    history: TabHistory,
    notifications: NotificationLedger,
    sync: SyncState,
}

impl<R: Router> TabController<R> {
    /// Mounts a controller on the router's current path. Non-canonical paths
    /// are replaced with the canonical path of the tab they resolve to.
    pub fn new(router: R) -> Self {
        let initial = path_to_tab(router.current_path());
        let mut controller = Self {
            router,
            current: initial,
            direction: TransitionDirection::None,
            history: TabHistory::new(initial),
            notifications: NotificationLedger::new(),
            sync: SyncState::Idle,
        };

        let path = controller.router.current_path().to_string();
        controller.redirect_if_non_canonical(&path, initial);
        controller
    }

    pub fn current_tab(&self) -> TabKey {
        self.current
    }

    pub fn transition_direction(&self) -> TransitionDirection {
        self.direction
    }

    pub fn history(&self) -> &TabHistory {
        &self.history
    }

    pub fn notifications(&self) -> &NotificationLedger {
        &self.notifications
    }

    pub fn sync_state(&self) -> &SyncState {
        &self.sync
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut R {
        &mut self.router
    }

    pub fn into_router(self) -> R {
        self.router
    }

    /// Reacts to a router path change. A path that is not the canonical path
    /// of the tab it resolves to is replaced with that canonical path.
    pub fn on_route_change(&mut self, path: &str) -> RouteOutcome {
        let resolved = path_to_tab(path);

        if let SyncState::Navigating { pending } = &mut self.sync {
            if pending.front() == Some(&resolved) {
                pending.pop_front();
                if pending.is_empty() {
                    self.sync = SyncState::Idle;
                }
                debug!(path, tab = %resolved, "absorbed navigation echo");
                return RouteOutcome::Echo;
            }
            debug!(path, tab = %resolved, "external navigation while awaiting echo");
            self.sync = SyncState::Idle;
        }

        let outcome = if resolved == self.current {
            RouteOutcome::Unchanged
        } else {
            self.apply(resolved);
            RouteOutcome::Applied(resolved)
        };
        self.redirect_if_non_canonical(path, resolved);
        outcome
    }

    /// Returns `false` when `tab` is already current.
    pub fn set_tab(&mut self, tab: TabKey) -> bool {
        if tab == self.current {
            return false;
        }
        self.apply(tab);
        self.request_navigation(tab, NavigateOptions::default());
        true
    }

    pub fn set_tab_by_id(&mut self, id: &str) -> Result<bool, CaseFileError> {
        let tab = id.parse::<TabKey>().inspect_err(|_| {
            debug!(id, "rejected unknown tab id");
        })?;
        Ok(self.set_tab(tab))
    }

    /// Navigates to the tab visited before the current one. History is
    /// append-only, so the target is appended again.
    pub fn go_back(&mut self) -> Option<TabKey> {
        let previous = self.history.previous()?;
        self.set_tab(previous);
        Some(previous)
    }

    pub fn handle_key(&mut self, chord: &KeyChord) -> bool {
        match chord.tab_shortcut() {
            Some(tab) => {
                self.set_tab(tab);
                true
            }
            None => false,
        }
    }

    pub fn handle_swipe(&mut self, gesture: &SwipeGesture) -> bool {
        let Some(step) = gesture.step() else {
            return false;
        };
        self.set_tab(adjacent_tab(self.current, step))
    }

    pub fn add_notification(&mut self, tab: TabKey, count: i64) -> u32 {
        self.notifications.increment(tab, count)
    }

    pub fn set_notification_count(&mut self, tab: TabKey, count: i64) -> u32 {
        self.notifications.set_value(tab, count)
    }

    pub fn clear_notifications(&mut self, tab: TabKey) {
        self.notifications.clear(tab);
    }

    pub fn snapshot(&self) -> NavSnapshot {
        NavSnapshot {
            current_tab: self.current,
            transition_direction: self.direction,
            history: self.history.as_slice().to_vec(),
            notifications: self.notifications.iter().collect(),
        }
    }

    fn apply(&mut self, tab: TabKey) {
        let previous = self.current;
        self.direction = TransitionDirection::between(previous, tab);
        self.history.push(tab);
        self.current = tab;
        debug!(from = %previous, to = %tab, direction = %self.direction, "tab transition");
    }

    fn redirect_if_non_canonical(&mut self, path: &str, tab: TabKey) {
        if path != tab_to_path(tab) {
            debug!(path, %tab, "redirecting to canonical tab path");
            self.request_navigation(tab, NavigateOptions { replace: true });
        }
    }

    fn request_navigation(&mut self, tab: TabKey, options: NavigateOptions) {
        if let SyncState::Navigating { pending } = &mut self.sync {
            pending.push_back(tab);
        } else {
            self.sync = SyncState::Navigating {
                pending: VecDeque::from([tab]),
            };
        }
        self.router.navigate(tab_to_path(tab), options);
    }
}

impl TabController<MemoryRouter> {
    /// Delivers every queued router change to the controller, including the
    /// echoes of canonical redirects issued while delivering.
    pub fn pump_router(&mut self) -> Vec<RouteOutcome> {
        let mut outcomes = Vec::new();
        loop {
            let changes = self.router.drain_changes();
            if changes.is_empty() {
                return outcomes;
            }
            for path in &changes {
                outcomes.push(self.on_route_change(path));
            }
        }
    }

    pub fn router_back(&mut self) -> Vec<RouteOutcome> {
        self.router.back();
        self.pump_router()
    }

    pub fn router_forward(&mut self) -> Vec<RouteOutcome> {
        self.router.forward();
        self.pump_router()
    }
}
