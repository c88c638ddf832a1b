use cf_core::CaseFileError;
use tracing::info;

use crate::controller::TabController;
use crate::router::Router;

/// Scope of one mounted dashboard view. The tab controller exists only
/// between `mount` and `unmount`; reaching for it outside that window is a
/// wiring bug and fails with `NAV_NO_SESSION`.
pub struct DashboardSession<R: Router> {
    controller: Option<TabController<R>>,
}

impl<R: Router> Default for DashboardSession<R> {
    fn default() -> Self {
        Self { controller: None }
    }
}

impl<R: Router> DashboardSession<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&mut self, router: R) -> Result<&mut TabController<R>, CaseFileError> {
        if self.controller.is_some() {
            return Err(CaseFileError::new(
                "NAV_SESSION_ACTIVE",
                "A dashboard session is already mounted.",
            ));
        }
        let controller = TabController::new(router);
        info!(tab = %controller.current_tab(), "dashboard session mounted");
        Ok(self.controller.insert(controller))
    }

    /// Tears the session down and hands the router back to the host.
    pub fn unmount(&mut self) -> Option<R> {
        let controller = self.controller.take()?;
        info!(
            visited = controller.history().len(),
            "dashboard session unmounted"
        );
        Some(controller.into_router())
    }

    pub fn is_active(&self) -> bool {
        self.controller.is_some()
    }

    pub fn tabs(&self) -> Result<&TabController<R>, CaseFileError> {
        self.controller.as_ref().ok_or_else(no_session)
    }

    pub fn tabs_mut(&mut self) -> Result<&mut TabController<R>, CaseFileError> {
        self.controller.as_mut().ok_or_else(no_session)
    }
}

fn no_session() -> CaseFileError {
    CaseFileError::new(
        "NAV_NO_SESSION",
        "Tab controller used outside of a mounted dashboard session.",
    )
}
