use serde::Serialize;

use crate::error::Error;
use crate::gateway::Gateway;
use crate::models::{
    AdminAnalytics, FoodCourt, FoodCourtUpdate, MenuItem, MenuItemUpdate, NewMenuItem, Order,
};
use crate::types::{MenuItemId, OrderId, OrderStatus};

/// Endpoints for a food-court admin. The backend scopes every call to the
/// food court assigned to the signed-in admin.
pub struct AdminApi<'a> {
    pub(super) gateway: &'a Gateway,
}

#[derive(Serialize)]
struct StatusChange {
    status: OrderStatus,
}

impl AdminApi<'_> {
    /// The food court this admin runs.
    ///
    /// # Errors
    ///
    /// Fails as [`Gateway::request`](crate::Gateway::request) does.
    pub async fn food_court(&self) -> Result<FoodCourt, Error> {
        self.gateway.get("/admin/food-court/").await
    }

    /// Open or close the food court and adjust its staffing figures.
    ///
    /// # Errors
    ///
    /// Fails as [`Gateway::request`](crate::Gateway::request) does.
    pub async fn update_food_court(&self, update: &FoodCourtUpdate) -> Result<FoodCourt, Error> {
        self.gateway.patch("/admin/food-court/update/", update).await
    }

    /// Every menu item, including unavailable ones.
    ///
    /// # Errors
    ///
    /// Fails as [`Gateway::request`](crate::Gateway::request) does.
    pub async fn menu_items(&self) -> Result<Vec<MenuItem>, Error> {
        self.gateway.get("/admin/menu-items/").await
    }

    /// # Errors
    ///
    /// Returns [`Error::RequestFailed`] with per-field messages when the
    /// backend rejects the item.
    pub async fn add_menu_item(&self, item: &NewMenuItem) -> Result<MenuItem, Error> {
        self.gateway.post("/admin/menu-items/", item).await
    }

    /// Change only the fields set in `update`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequestFailed`] with status 404 for an item of
    /// another food court.
    pub async fn update_menu_item(
        &self,
        id: MenuItemId,
        update: &MenuItemUpdate,
    ) -> Result<MenuItem, Error> {
        self.gateway
            .patch(&format!("/admin/menu-items/{id}/"), update)
            .await
    }

    /// Delete a menu item. The backend answers with an empty body.
    ///
    /// # Errors
    ///
    /// Fails as [`Gateway::request`](crate::Gateway::request) does.
    pub async fn delete_menu_item(&self, id: MenuItemId) -> Result<(), Error> {
        self.gateway.delete(&format!("/admin/menu-items/{id}/")).await
    }

    /// Incoming orders for this food court.
    ///
    /// # Errors
    ///
    /// Fails as [`Gateway::request`](crate::Gateway::request) does.
    pub async fn orders(&self) -> Result<Vec<Order>, Error> {
        self.gateway.get("/admin/orders/").await
    }

    /// Move an order to `status`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequestFailed`] if the backend refuses the change.
    pub async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, Error> {
        self.gateway
            .patch(&format!("/admin/orders/{id}/status/"), &StatusChange { status })
            .await
    }

    /// Today's orders, revenue and best seller.
    ///
    /// # Errors
    ///
    /// Fails as [`Gateway::request`](crate::Gateway::request) does.
    pub async fn analytics(&self) -> Result<AdminAnalytics, Error> {
        self.gateway.get("/admin/analytics/").await
    }
}
