use tracing::debug;

use super::models::ApplicationModel;
use crate::shared::AppError;

/// Per-operation requirement on the calling application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoutePolicy {
    /// The caller must be a registered application
    pub authenticated: bool,
    /// The caller's application must be premium
    pub premium: bool,
}

impl RoutePolicy {
    /// Session creation: any premium application, no prior session needed
    pub const ISSUE: RoutePolicy = RoutePolicy {
        authenticated: false,
        premium: true,
    };

    /// Session lookup and revocation
    pub const MANAGE: RoutePolicy = RoutePolicy {
        authenticated: true,
        premium: true,
    };

    pub const OPEN: RoutePolicy = RoutePolicy {
        authenticated: false,
        premium: false,
    };

    /// Whether the route can only be reached with a resolved application
    pub fn requires_application(&self) -> bool {
        self.authenticated || self.premium
    }
}

/// Decides whether the calling application may use a route.
///
/// Pure decision: no I/O, must run before any session store access.
pub fn evaluate(
    application: Option<&ApplicationModel>,
    policy: RoutePolicy,
) -> Result<(), AppError> {
    let Some(application) = application else {
        if policy.requires_application() {
            debug!(?policy, "Denied: no calling application");
            return Err(AppError::ApplicationNotAuthorized);
        }
        return Ok(());
    };

    if policy.premium && !application.premium {
        debug!(application = %application.name, "Denied: application is not premium");
        return Err(AppError::ApplicationNotAuthorized);
    }

    Ok(())
}
