//! Order pricing: subtotal, GST, shipping and total.
//!
//! All amounts keep full precision; rounding happens only when a
//! [`Money`] is displayed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::domain::aggregates::CartItem;
use crate::domain::value_objects::Money;

/// GST rate applied to the subtotal (18%).
pub const GST_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Subtotals strictly above this ship free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(2999, 0, 0, false, 0);

pub const SHIPPING_FEE: Decimal = Decimal::from_parts(199, 0, 0, false, 0);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: Money,
    pub gst: Money,
    pub shipping: Money,
    pub total: Money,
}

impl PriceBreakdown {
    pub fn from_subtotal(subtotal: Decimal) -> Self {
        let gst = subtotal * GST_RATE;
        let shipping = shipping_fee(subtotal);
        Self {
            subtotal: Money::inr(subtotal),
            gst: Money::inr(gst),
            shipping: Money::inr(shipping),
            total: Money::inr(subtotal + gst + shipping),
        }
    }

    pub fn free_shipping(&self) -> bool { self.shipping.amount().is_zero() }
}

pub fn subtotal(lines: &[CartItem]) -> Decimal {
    lines.iter().map(|l| l.line_total().amount()).sum()
}

pub fn shipping_fee(subtotal: Decimal) -> Decimal {
    if subtotal > FREE_SHIPPING_THRESHOLD { Decimal::ZERO } else { SHIPPING_FEE }
}

pub fn price_lines(lines: &[CartItem]) -> PriceBreakdown { PriceBreakdown::from_subtotal(subtotal(lines)) }
