// Application state shared across all modules

use std::sync::Arc;

use crate::auth::service::AuthService;
use crate::auth::store::SqliteUserStore;
use crate::services::GoogleAuthService;

/// Application state shared with every handler via `Extension`.
/// Read-only at runtime; the signing secret and OAuth credentials are fixed
/// at startup.
pub struct AppState {
    pub auth_service: Arc<AuthService<SqliteUserStore>>,
    pub google_service: Arc<GoogleAuthService>,
}
