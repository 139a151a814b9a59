use std::ops::ControlFlow;
use std::time::Duration;

use crate::error::Error;
use crate::gateway::Gateway;
use crate::models::Order;

/// A student's orders split by whether they can still change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBoard {
    /// Pending, preparing or ready.
    pub active: Vec<Order>,
    /// Completed or cancelled.
    pub past: Vec<Order>,
}

impl OrderBoard {
    #[must_use]
    pub fn from_orders(orders: Vec<Order>) -> Self {
        let (past, active) = orders
            .into_iter()
            .partition(|order| order.status.is_terminal());
        Self { active, past }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.past.is_empty()
    }
}

/// Polls the student's orders so status changes show up without push.
pub struct OrderTracker<'a> {
    gateway: &'a Gateway,
    interval: Duration,
}

impl<'a> OrderTracker<'a> {
    /// Tracker polling at the gateway's configured interval.
    #[must_use]
    pub fn new(gateway: &'a Gateway) -> Self {
        Self {
            gateway,
            interval: gateway.config().poll_interval(),
        }
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Fetch the orders once and split them.
    ///
    /// # Errors
    ///
    /// Fails as [`Gateway::request`] does.
    pub async fn refresh(&self) -> Result<OrderBoard, Error> {
        let orders = self.gateway.student().orders().await?;
        Ok(OrderBoard::from_orders(orders))
    }

    /// Fetch now and then once per interval, passing each result to
    /// `on_update`.
    ///
    /// Stops when `on_update` returns [`ControlFlow::Break`] or the session
    /// expires. Other errors are handed to `on_update` and polling goes on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthorized`] once the session has expired.
    pub async fn watch<F>(&self, mut on_update: F) -> Result<(), Error>
    where
        F: FnMut(Result<OrderBoard, Error>) -> ControlFlow<()>,
    {
        // A zero period would make `interval` panic.
        let mut ticker = tokio::time::interval(self.interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match self.refresh().await {
                Err(Error::Unauthorized) => return Err(Error::Unauthorized),
                result => {
                    if let Err(e) = &result {
                        tracing::warn!(error = %e, "Order refresh failed");
                    }
                    if on_update(result).is_break() {
                        return Ok(());
                    }
                }
            }
        }
    }
}
