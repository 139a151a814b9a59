use serde::Serialize;

use crate::cart::OrderPlacer;
use crate::error::Error;
use crate::gateway::Gateway;
use crate::models::{
    FoodCourt, Order, PlaceOrderRequest, Transaction, WalletBalance, WalletRecharge,
};
use crate::types::{Amount, FoodCourtId, OrderId};

/// Browsing, ordering and wallet endpoints for students.
pub struct StudentApi<'a> {
    pub(super) gateway: &'a Gateway,
}

#[derive(Serialize)]
struct TopUp {
    amount: Amount,
}

impl StudentApi<'_> {
    /// Food courts visible to students.
    ///
    /// # Errors
    ///
    /// Fails as [`Gateway::request`](crate::Gateway::request) does.
    pub async fn food_courts(&self) -> Result<Vec<FoodCourt>, Error> {
        self.gateway.get("/food-courts/").await
    }

    /// A single food court with its menu embedded.
    ///
    /// # Errors
    ///
    /// Fails as [`Gateway::request`](crate::Gateway::request) does.
    pub async fn food_court(&self, id: FoodCourtId) -> Result<FoodCourt, Error> {
        self.gateway.get(&format!("/food-courts/{id}/")).await
    }

    /// Place an order. The backend debits the wallet; an insufficient
    /// balance surfaces as [`Error::RequestFailed`] with status 400.
    ///
    /// # Errors
    ///
    /// Fails as [`Gateway::request`](crate::Gateway::request) does.
    pub async fn place_order(&self, order: &PlaceOrderRequest) -> Result<Order, Error> {
        self.gateway.post("/student/orders/place/", order).await
    }

    /// The student's orders, newest first.
    ///
    /// # Errors
    ///
    /// Fails as [`Gateway::request`](crate::Gateway::request) does.
    pub async fn orders(&self) -> Result<Vec<Order>, Error> {
        self.gateway.get("/student/orders/").await
    }

    /// # Errors
    ///
    /// Returns [`Error::RequestFailed`] with status 404 for an order of
    /// another student.
    pub async fn order(&self, id: OrderId) -> Result<Order, Error> {
        self.gateway.get(&format!("/student/orders/{id}/")).await
    }

    /// Current wallet balance.
    ///
    /// # Errors
    ///
    /// Fails as [`Gateway::request`](crate::Gateway::request) does.
    pub async fn wallet_balance(&self) -> Result<Amount, Error> {
        let body: WalletBalance = self.gateway.get("/student/wallet/balance/").await?;
        Ok(body.balance)
    }

    /// Wallet ledger, newest first.
    ///
    /// # Errors
    ///
    /// Fails as [`Gateway::request`](crate::Gateway::request) does.
    pub async fn wallet_transactions(&self) -> Result<Vec<Transaction>, Error> {
        self.gateway.get("/student/wallet/transactions/").await
    }

    /// Top up the wallet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAmount`] without contacting the server if
    /// `amount` is not positive.
    pub async fn add_wallet_balance(&self, amount: Amount) -> Result<WalletRecharge, Error> {
        if !amount.is_positive() {
            return Err(Error::InvalidAmount(amount.to_string()));
        }
        self.gateway
            .post("/student/wallet/add/", &TopUp { amount })
            .await
    }
}

impl OrderPlacer for Gateway {
    async fn place_order(&self, order: &PlaceOrderRequest) -> Result<Order, Error> {
        self.student().place_order(order).await
    }
}
