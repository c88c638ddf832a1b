//! Dashboard tab navigation: path mapping, visit history, unread counters and
//! the controller that keeps them in step with an external URL router.

pub mod controller;
pub mod history;
pub mod input;
pub mod ledger;
pub mod path_map;
pub mod router;
pub mod session;

pub use controller::{NavSnapshot, RouteOutcome, SyncState, TabController};
pub use history::TabHistory;
pub use input::{adjacent_tab, KeyChord, Modifiers, SwipeGesture, SwipeStep};
pub use ledger::NotificationLedger;
pub use path_map::{path_to_tab, tab_to_path, DASHBOARD_ROOT};
pub use router::{MemoryRouter, NavigateOptions, Router};
pub use session::DashboardSession;
