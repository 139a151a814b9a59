use serde::Serialize;

use crate::error::Error;
use crate::gateway::Gateway;
use crate::models::{FoodCourt, NewAdmin, NewFoodCourt, SystemAnalytics, User};
use crate::types::{FoodCourtId, UserId};

/// Platform administration: food courts, their admins, users and revenue.
pub struct SuperAdminApi<'a> {
    pub(super) gateway: &'a Gateway,
}

#[derive(Serialize)]
struct AdminAssignment {
    admin_id: UserId,
}

#[derive(Serialize)]
struct BlockChange {
    is_blocked: bool,
}

impl SuperAdminApi<'_> {
    /// All food courts, open or not.
    ///
    /// # Errors
    ///
    /// Fails as [`Gateway::request`](crate::Gateway::request) does.
    pub async fn food_courts(&self) -> Result<Vec<FoodCourt>, Error> {
        self.gateway.get("/superadmin/food-courts/").await
    }

    /// # Errors
    ///
    /// Returns [`Error::RequestFailed`] if `court.admin` is not a food-court
    /// admin or a field is invalid.
    pub async fn create_food_court(&self, court: &NewFoodCourt) -> Result<FoodCourt, Error> {
        self.gateway
            .post("/superadmin/food-courts/create/", court)
            .await
    }

    /// Reassign a food court to another food-court admin.
    ///
    /// # Errors
    ///
    /// Fails as [`Gateway::request`](crate::Gateway::request) does.
    pub async fn update_food_court_admin(
        &self,
        food_court: FoodCourtId,
        admin: UserId,
    ) -> Result<FoodCourt, Error> {
        self.gateway
            .patch(
                &format!("/superadmin/food-courts/{food_court}/update-admin/"),
                &AdminAssignment { admin_id: admin },
            )
            .await
    }

    /// Create a food-court admin account.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequestFailed`] with field errors for a taken
    /// username or email.
    pub async fn create_admin(&self, admin: &NewAdmin) -> Result<User, Error> {
        self.gateway.post("/superadmin/admins/create/", admin).await
    }

    /// Every registered user.
    ///
    /// # Errors
    ///
    /// Fails as [`Gateway::request`](crate::Gateway::request) does.
    pub async fn users(&self) -> Result<Vec<User>, Error> {
        self.gateway.get("/superadmin/users/").await
    }

    /// Block or unblock a user's access.
    ///
    /// # Errors
    ///
    /// Fails as [`Gateway::request`](crate::Gateway::request) does.
    pub async fn block_user(&self, user: UserId, blocked: bool) -> Result<User, Error> {
        self.gateway
            .patch(
                &format!("/superadmin/users/{user}/block/"),
                &BlockChange {
                    is_blocked: blocked,
                },
            )
            .await
    }

    /// Platform-wide revenue, order and user counts.
    ///
    /// # Errors
    ///
    /// Fails as [`Gateway::request`](crate::Gateway::request) does.
    pub async fn analytics(&self) -> Result<SystemAnalytics, Error> {
        self.gateway.get("/superadmin/analytics/").await
    }
}
