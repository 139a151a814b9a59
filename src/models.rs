//! Wire models exchanged with the backend.
//!
//! Response models tolerate missing optional fields; request payloads only
//! serialize what the caller set.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::{
    Amount, FoodCourtId, MenuItemId, OrderId, OrderItemId, OrderStatus, Role, TransactionId,
    TransactionType, UserId,
};

/// Authenticated user profile, as returned by login and `/auth/profile/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub wallet_balance: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_blocked: bool,
}

impl User {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct FoodCourt {
    pub id: FoodCourtId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub is_open: bool,
    #[serde(default)]
    pub avg_preparation_time: u32,
    #[serde(default)]
    pub active_staff_count: u32,
    #[serde(default)]
    pub estimated_waiting_time: u32,
    #[serde(default)]
    pub admin: Option<UserId>,
    #[serde(default)]
    pub admin_name: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    /// Present only on the single food-court detail endpoint.
    #[serde(default)]
    pub menu_items: Option<Vec<MenuItem>>,
}

/// A purchasable product of one food court.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Amount,
    #[serde(default)]
    pub image_url: Option<String>,
    pub is_available: bool,
    #[serde(default)]
    pub category: String,
    pub food_court: FoodCourtId,
}

impl MenuItem {
    /// Create a menu item with the fields the cart depends on.
    #[must_use]
    pub fn new(
        id: MenuItemId,
        food_court: FoodCourtId,
        name: impl Into<String>,
        price: Amount,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            price,
            image_url: None,
            is_available: true,
            category: String::new(),
            food_court,
        }
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the availability flag.
    #[must_use]
    pub fn with_available(mut self, available: bool) -> Self {
        self.is_available = available;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct OrderItem {
    pub id: OrderItemId,
    pub menu_item: MenuItemId,
    pub menu_item_name: String,
    pub quantity: u32,
    /// Unit price captured when the order was placed.
    pub price: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Order {
    pub id: OrderId,
    pub student: UserId,
    #[serde(default)]
    pub student_name: String,
    pub food_court: FoodCourtId,
    #[serde(default)]
    pub food_court_name: String,
    pub status: OrderStatus,
    pub total_amount: Amount,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Wallet ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Transaction {
    pub id: TransactionId,
    pub transaction_type: TransactionType,
    pub amount: Amount,
    #[serde(default)]
    pub description: String,
    pub balance_after: Amount,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalletBalance {
    pub balance: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletRecharge {
    pub balance: Amount,
    #[serde(default)]
    pub message: String,
}

/// Today's figures for one food court.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct AdminAnalytics {
    pub total_orders_today: u64,
    pub revenue_today: Amount,
    pub most_selling_item: String,
    pub most_selling_quantity: u64,
}

/// Platform-wide figures for the super-admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct SystemAnalytics {
    pub total_revenue: Amount,
    pub today_revenue: Amount,
    pub total_orders: u64,
    pub total_students: u64,
    pub total_food_courts: u64,
}

/// Login and registration response.
#[derive(Debug, Clone, Deserialize)]
#[non_exhaustive]
pub struct AuthResponse {
    pub user: User,
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RefreshResponse {
    pub access: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Self-service registration. The role is always sent as `student`.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub(crate) role: Role,
}

impl RegisterRequest {
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: None,
            role: Role::Student,
        }
    }

    /// Set the phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
}

/// Order placement payload: one food court, one line per menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub food_court: FoodCourtId,
    pub items: Vec<OrderLine>,
}

#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct NewMenuItem {
    pub name: String,
    pub description: String,
    pub price: Amount,
    pub category: String,
    pub is_available: bool,
    pub food_court: FoodCourtId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NewMenuItem {
    #[must_use]
    pub fn new(
        food_court: FoodCourtId,
        name: impl Into<String>,
        price: Amount,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            price,
            category: category.into(),
            is_available: true,
            food_court,
            image_url: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_available(mut self, available: bool) -> Self {
        self.is_available = available;
        self
    }
}

/// Partial menu item update; unset fields are left unchanged server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MenuItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Partial update of the admin's own food court.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FoodCourtUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_open: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_preparation_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_staff_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct NewFoodCourt {
    pub name: String,
    pub description: String,
    pub admin: UserId,
    pub is_open: bool,
    pub avg_preparation_time: u32,
    pub active_staff_count: u32,
}

impl NewFoodCourt {
    #[must_use]
    pub fn new(name: impl Into<String>, admin: UserId) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            admin,
            is_open: true,
            avg_preparation_time: 15,
            active_staff_count: 1,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_staffing(mut self, avg_preparation_time: u32, active_staff_count: u32) -> Self {
        self.avg_preparation_time = avg_preparation_time;
        self.active_staff_count = active_staff_count;
        self
    }

    #[must_use]
    pub fn with_open(mut self, is_open: bool) -> Self {
        self.is_open = is_open;
        self
    }
}

/// Food-court admin account created by the super-admin.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct NewAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewAdmin {
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}
