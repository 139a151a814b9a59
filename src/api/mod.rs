//! Typed endpoints of the food-court backend, grouped by role.
//!
//! Each group borrows the [`Gateway`] and goes through its
//! refresh-and-retry handling.
//!
//! ```rust,ignore
//! let user = gateway.auth().login("asha", "secret").await?;
//! let courts = gateway.student().food_courts().await?;
//! ```

mod admin;
mod auth;
mod student;
mod superadmin;

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use student::StudentApi;
pub use superadmin::SuperAdminApi;

use crate::gateway::Gateway;

impl Gateway {
    #[must_use]
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { gateway: self }
    }

    #[must_use]
    pub fn student(&self) -> StudentApi<'_> {
        StudentApi { gateway: self }
    }

    /// Endpoints for the admin of a single food court.
    #[must_use]
    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi { gateway: self }
    }

    #[must_use]
    pub fn super_admin(&self) -> SuperAdminApi<'_> {
        SuperAdminApi { gateway: self }
    }
}
