#![doc = include_str!("../README.md")]

#[cfg(feature = "client")]
pub mod api;
pub mod cart;
pub mod config;
pub mod error;
#[cfg(feature = "client")]
pub mod gateway;
pub mod models;
pub mod navigation;
pub mod session;
pub mod storage;
#[cfg(feature = "client")]
pub mod tracker;
pub mod types;

// Re-exports for convenient access
#[cfg(feature = "client")]
pub use api::{AdminApi, AuthApi, StudentApi, SuperAdminApi};
pub use cart::{AddOutcome, Cart, CartLine, OrderPlacer};
pub use config::ClientConfig;
pub use error::Error;
#[cfg(feature = "client")]
pub use gateway::{ApiRequest, Gateway};
pub use models::{
    AdminAnalytics, AuthResponse, FoodCourt, FoodCourtUpdate, MenuItem, MenuItemUpdate,
    NewAdmin, NewFoodCourt, NewMenuItem, Order, OrderItem, OrderLine, PlaceOrderRequest,
    RegisterRequest, SystemAnalytics, Transaction, User, WalletRecharge,
};
pub use navigation::{NoNavigation, Navigator, Route};
pub use session::Session;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
#[cfg(feature = "client")]
pub use tracker::{OrderBoard, OrderTracker};
pub use types::{
    Amount, FoodCourtId, MenuItemId, OrderId, OrderItemId, OrderStatus, Role, TransactionId,
    TransactionType, UserId,
};
