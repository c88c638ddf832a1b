use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigateOptions {
    pub replace: bool,
}

/// URL router the tab controller delegates navigation to.
///
/// The router owns URL history. Path changes it performs, including its own
/// back/forward, reach the controller through `TabController::on_route_change`.
pub trait Router {
    fn navigate(&mut self, path: &str, options: NavigateOptions);
    fn current_path(&self) -> &str;
}

/// Browser-like history held in memory. Every change of the current path is
/// queued so the host can forward it to the controller in arrival order.
#[derive(Debug, Clone)]
pub struct MemoryRouter {
    entries: Vec<String>,
    cursor: usize,
    changes: VecDeque<String>,
}

impl MemoryRouter {
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            entries: vec![initial_path.into()],
            cursor: 0,
            changes: VecDeque::new(),
        }
    }

    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.emit_current();
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        self.emit_current();
        true
    }

    pub fn drain_changes(&mut self) -> Vec<String> {
        self.changes.drain(..).collect()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    fn emit_current(&mut self) {
        let path = self.entries[self.cursor].clone();
        self.changes.push_back(path);
    }
}

impl Router for MemoryRouter {
    fn navigate(&mut self, path: &str, options: NavigateOptions) {
        if options.replace {
            self.entries[self.cursor] = path.to_string();
        } else {
            self.entries.truncate(self.cursor + 1);
            self.entries.push(path.to_string());
            self.cursor += 1;
        }
        self.emit_current();
    }

    fn current_path(&self) -> &str {
        &self.entries[self.cursor]
    }
}

#[cfg(test)]
mod router_tests {
    use super::*;

    #[test]
    fn navigate_pushes_and_queues_change() {
        let mut router = MemoryRouter::new("/dashboard");
        router.navigate("/dashboard/data", NavigateOptions::default());
        assert_eq!(router.current_path(), "/dashboard/data");
        assert_eq!(router.drain_changes(), vec!["/dashboard/data".to_string()]);
        assert!(router.drain_changes().is_empty());
    }

    #[test]
    fn replace_overwrites_current_entry() {
        let mut router = MemoryRouter::new("/dashboard");
        router.navigate("/dashboard/team", NavigateOptions { replace: true });
        assert_eq!(router.entries(), &["/dashboard/team".to_string()]);
    }

    #[test]
    fn back_and_forward_move_cursor_and_truncate_on_new_push() {
        let mut router = MemoryRouter::new("/dashboard/chat");
        router.navigate("/dashboard/data", NavigateOptions::default());
        router.navigate("/dashboard/files", NavigateOptions::default());
        router.drain_changes();

        assert!(router.back());
        assert_eq!(router.current_path(), "/dashboard/data");
        assert!(router.forward());
        assert!(!router.forward());
        assert!(router.back());
        router.navigate("/dashboard/team", NavigateOptions::default());
        assert_eq!(
            router.entries(),
            &[
                "/dashboard/chat".to_string(),
                "/dashboard/data".to_string(),
                "/dashboard/team".to_string(),
            ]
        );
        assert_eq!(router.drain_changes().len(), 4);
        assert!(router.back());
        assert!(router.back());
        assert!(!router.back());
    }
}
