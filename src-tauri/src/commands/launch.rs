use crate::context::AppContext;
use serde::Serialize;
#[cfg(feature = "app")]
use std::sync::Arc;

/// First screen after the splash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LaunchRoute {
    Dashboard,
    Onboarding,
    Welcome,
}

/// A signed-in user always lands on the dashboard; otherwise onboarding is
/// shown until it has been completed once.
pub fn launch_route(signed_in: bool, is_first_launch: bool) -> LaunchRoute {
    if signed_in {
        LaunchRoute::Dashboard
    } else if is_first_launch {
        LaunchRoute::Onboarding
    } else {
        LaunchRoute::Welcome
    }
}

pub fn launch_route_internal(ctx: &AppContext) -> Result<LaunchRoute, String> {
    let settings = ctx.settings()?;
    Ok(launch_route(
        ctx.auth.current_user().is_some(),
        settings.is_first_launch,
    ))
}

#[cfg(feature = "app")]
#[tauri::command]
pub fn get_launch_route(ctx: tauri::State<'_, Arc<AppContext>>) -> Result<LaunchRoute, String> {
    launch_route_internal(ctx.inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_in_wins_over_first_launch() {
        assert_eq!(launch_route(true, true), LaunchRoute::Dashboard);
        assert_eq!(launch_route(false, true), LaunchRoute::Onboarding);
        assert_eq!(launch_route(false, false), LaunchRoute::Welcome);
    }
}
