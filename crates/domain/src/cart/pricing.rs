//! Price breakdown for a cart.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

use super::{CartItem, Money};

/// Pricing rules applied at checkout.
///
/// Defaults are the storefront's: free shipping strictly above $100.00,
/// otherwise a flat $10.00, and 15% tax on the items subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPolicy {
    /// Items subtotal that must be exceeded for free shipping.
    pub free_shipping_over: Money,

    /// Shipping charged when the subtotal does not exceed the threshold.
    pub flat_shipping: Money,

    /// Tax rate in basis points (1500 = 15%).
    pub tax_rate_bps: u32,
}

impl PricingPolicy {
    /// Shipping price for a given items subtotal.
    pub fn shipping_for(&self, items_price: Money) -> Money {
        if items_price > self.free_shipping_over {
            Money::zero()
        } else {
            self.flat_shipping
        }
    }

    /// Tax for a given items subtotal, rounded to the cent.
    pub fn tax_for(&self, items_price: Money) -> Money {
        items_price.apply_rate_bps(self.tax_rate_bps)
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_over: Money::from_dollars(100),
            flat_shipping: Money::from_dollars(10),
            tax_rate_bps: 1500,
        }
    }
}

/// Derived prices for a list of cart items.
///
/// Never stored; recomputed from the items whenever it is needed. Amounts are
/// whole cents, so `items + shipping + tax == total` holds exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub items_price: Money,
    pub shipping_price: Money,
    pub tax_price: Money,
    pub total_price: Money,
}

impl PriceBreakdown {
    /// Computes the breakdown for `items` under `policy`.
    pub fn compute(items: &[CartItem], policy: &PricingPolicy) -> Self {
        let items_price: Money = items.iter().map(CartItem::line_total).sum();
        let shipping_price = policy.shipping_for(items_price);
        let tax_price = policy.tax_for(items_price);

        Self {
            items_price,
            shipping_price,
            tax_price,
            total_price: items_price + shipping_price + tax_price,
        }
    }

    /// Items subtotal, or an error when a line or the sum exceeds
    /// [`Money::LIMIT`].
    pub fn checked_items_price(items: &[CartItem]) -> Result<Money, ValidationError> {
        items.iter().try_fold(Money::zero(), |acc, item| {
            acc.checked_add(item.checked_line_total()?)
                .filter(Money::is_within_limit)
                .ok_or(ValidationError::AmountOutOfRange)
        })
    }

    /// Returns true if the parts add up to the total.
    pub fn is_consistent(&self) -> bool {
        self.items_price + self.shipping_price + self.tax_price == self.total_price
    }
}
