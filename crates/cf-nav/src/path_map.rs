use cf_core::TabKey;

pub const DASHBOARD_ROOT: &str = "/dashboard";

pub fn tab_to_path(tab: TabKey) -> &'static str {
    match tab {
        TabKey::Chat => "/dashboard/chat",
        TabKey::Data => "/dashboard/data",
        TabKey::Files => "/dashboard/files",
        TabKey::Team => "/dashboard/team",
    }
}

/// Resolves a router path to a tab. Anything that is not a tab path,
/// including the bare dashboard root, lands on the default tab.
pub fn path_to_tab(path: &str) -> TabKey {
    let Some(rest) = path.strip_prefix(DASHBOARD_ROOT) else {
        return TabKey::DEFAULT;
    };
    let Some(segment) = rest.strip_prefix('/') else {
        return TabKey::DEFAULT;
    };
    let segment = segment.strip_suffix('/').unwrap_or(segment);
    segment.parse::<TabKey>().unwrap_or(TabKey::DEFAULT)
}
