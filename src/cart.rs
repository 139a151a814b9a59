//! Shopping cart bound to a single food court.
//!
//! Adding an item from another food court does not silently discard the
//! current cart. [`Cart::add_item`] parks the item and reports
//! [`AddOutcome::Conflict`]; the caller resolves it with
//! [`Cart::confirm_switch`] or [`Cart::cancel_switch`].
//!
//! ```rust,ignore
//! match cart.add_item(item) {
//!     AddOutcome::Added { .. } => {}
//!     AddOutcome::Conflict { .. } => {
//!         if ask_user_to_switch() {
//!             cart.confirm_switch();
//!         } else {
//!             cart.cancel_switch();
//!         }
//!     }
//! }
//! let order = cart.checkout(&gateway, gateway.navigator()).await?;
//! ```

use std::future::Future;

use crate::error::Error;
use crate::models::{MenuItem, Order, OrderLine, PlaceOrderRequest};
use crate::navigation::{Navigator, Route};
use crate::types::{Amount, FoodCourtId, MenuItemId};

/// Submits an order on the cart's behalf.
///
/// Implemented by [`Gateway`](crate::Gateway); tests and alternative
/// transports can provide their own.
pub trait OrderPlacer: Send + Sync {
    fn place_order(
        &self,
        order: &PlaceOrderRequest,
    ) -> impl Future<Output = Result<Order, Error>> + Send;
}

/// One distinct menu item and how many of it.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub menu_item: MenuItem,
    pub quantity: u32,
}

impl CartLine {
    #[must_use]
    pub fn subtotal(&self) -> Amount {
        self.menu_item.price * self.quantity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The item is in the cart with the given quantity.
    Added { quantity: u32 },
    /// The cart holds items from `current`; the new item from `requested` is
    /// parked until the switch is confirmed or cancelled.
    Conflict {
        current: FoodCourtId,
        requested: FoodCourtId,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
    food_court: Option<FoodCourtId>,
    is_open: bool,
    pending_switch: Option<MenuItem>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Food court the cart is bound to; `None` exactly when the cart is empty.
    #[must_use]
    pub fn food_court(&self) -> Option<FoodCourtId> {
        self.food_court
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn quantity_of(&self, id: MenuItemId) -> u32 {
        self.lines
            .iter()
            .find(|line| line.menu_item.id == id)
            .map_or(0, |line| line.quantity)
    }

    /// Sum of price × quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Amount {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Sum of quantities over all lines, saturating at `u32::MAX`.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |count, line| count.saturating_add(line.quantity))
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn set_open(&mut self, open: bool) {
        self.is_open = open;
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Item waiting for a food-court switch decision.
    #[must_use]
    pub fn pending_switch(&self) -> Option<&MenuItem> {
        self.pending_switch.as_ref()
    }

    /// Add one of `item`, opening the cart panel.
    ///
    /// If the cart already holds items of another food court nothing is
    /// added; see [`AddOutcome::Conflict`].
    pub fn add_item(&mut self, item: MenuItem) -> AddOutcome {
        if let Some(current) = self.food_court {
            if current != item.food_court && !self.lines.is_empty() {
                tracing::debug!(%current, requested = %item.food_court, "Cart food court conflict");
                let requested = item.food_court;
                self.pending_switch = Some(item);
                return AddOutcome::Conflict { current, requested };
            }
        }

        self.pending_switch = None;
        self.food_court = Some(item.food_court);
        self.is_open = true;

        let quantity = match self.lines.iter_mut().find(|line| line.menu_item.id == item.id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(1);
                line.quantity
            }
            None => {
                self.lines.push(CartLine {
                    menu_item: item,
                    quantity: 1,
                });
                1
            }
        };
        tracing::debug!(quantity, "Added to cart");
        AddOutcome::Added { quantity }
    }

    /// Discard the current cart and add the parked item.
    ///
    /// Returns `None` if no switch was pending.
    pub fn confirm_switch(&mut self) -> Option<AddOutcome> {
        let item = self.pending_switch.take()?;
        self.clear();
        Some(self.add_item(item))
    }

    /// Drop the parked item and keep the cart as it is.
    pub fn cancel_switch(&mut self) {
        self.pending_switch = None;
    }

    /// Remove the line for `id`. Absent ids are ignored.
    pub fn remove_item(&mut self, id: MenuItemId) {
        self.lines.retain(|line| line.menu_item.id != id);
        self.unbind_if_empty();
    }

    /// Change a line's quantity by `delta`. A result of zero or less removes
    /// the line; the quantity saturates at `u32::MAX`. Absent ids are ignored.
    pub fn update_quantity(&mut self, id: MenuItemId, delta: i64) {
        let Some(index) = self.lines.iter().position(|line| line.menu_item.id == id) else {
            return;
        };

        let quantity = i64::from(self.lines[index].quantity).saturating_add(delta);
        if quantity <= 0 {
            self.lines.remove(index);
            self.unbind_if_empty();
        } else {
            self.lines[index].quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    /// Empty the cart and drop its food-court binding.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.food_court = None;
        self.pending_switch = None;
    }

    /// The order payload for the current cart, lines in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCart`] if the cart is empty or unbound.
    pub fn order_request(&self) -> Result<PlaceOrderRequest, Error> {
        if self.lines.is_empty() {
            return Err(Error::InvalidCart("cart is empty"));
        }
        let food_court = self
            .food_court
            .ok_or(Error::InvalidCart("cart is not bound to a food court"))?;

        Ok(PlaceOrderRequest {
            food_court,
            items: self
                .lines
                .iter()
                .map(|line| OrderLine {
                    menu_item_id: line.menu_item.id,
                    quantity: line.quantity,
                })
                .collect(),
        })
    }

    /// Submit the cart as an order.
    ///
    /// On success the cart is cleared and closed, `navigator` is sent to
    /// [`Route::OrderTracking`], and the created order is returned. On failure
    /// the cart is left exactly as it was so the user can retry.
    pub async fn checkout<P: OrderPlacer>(
        &mut self,
        placer: &P,
        navigator: &dyn Navigator,
    ) -> Result<Order, Error> {
        let request = self.order_request()?;

        let order = placer.place_order(&request).await.inspect_err(|e| {
            tracing::warn!(error = %e, food_court = %request.food_court, "Checkout failed");
        })?;

        tracing::info!(order_id = %order.id, total = %order.total_amount, "Order placed");
        self.clear();
        self.close();
        navigator.navigate(Route::OrderTracking);
        Ok(order)
    }

    fn unbind_if_empty(&mut self) {
        if self.lines.is_empty() {
            self.food_court = None;
        }
    }
}
