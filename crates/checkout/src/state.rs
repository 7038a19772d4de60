//! Checkout workflow state machine.

use serde::{Deserialize, Serialize};

/// The step a checkout session is on.
///
/// State transitions:
/// ```text
/// Cart ──► Shipping ──► Payment ──► Review ──► Submitting ──┬──► Success
///                                     ▲                     └──► Failed
///                                     └──────────── retry ───────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    /// Reviewing cart contents.
    #[default]
    Cart,

    /// Capturing the shipping address.
    Shipping,

    /// Selecting a payment method.
    Payment,

    /// Reviewing the order before placing it.
    Review,

    /// The order is being submitted; every other request is refused.
    Submitting,

    /// The backend accepted the order.
    Success,

    /// The backend rejected the order or could not be reached.
    Failed,
}

impl CheckoutStep {
    /// Steps the customer can navigate to directly.
    pub const NAVIGABLE: [CheckoutStep; 4] = [
        CheckoutStep::Cart,
        CheckoutStep::Shipping,
        CheckoutStep::Payment,
        CheckoutStep::Review,
    ];

    /// Returns true if this step can be entered by navigation.
    pub fn is_navigable(&self) -> bool {
        Self::NAVIGABLE.contains(self)
    }

    /// Returns true if the session may leave this step by navigation.
    pub fn can_navigate(&self) -> bool {
        !matches!(self, CheckoutStep::Submitting)
    }

    /// Returns true if an order can be placed from this step.
    pub fn can_place_order(&self) -> bool {
        matches!(self, CheckoutStep::Review | CheckoutStep::Failed)
    }

    /// Returns true once a submission has finished, successfully or not.
    pub fn is_settled(&self) -> bool {
        matches!(self, CheckoutStep::Success | CheckoutStep::Failed)
    }

    /// Returns the step name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Cart => "cart",
            CheckoutStep::Shipping => "shipping",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Review => "review",
            CheckoutStep::Submitting => "submitting",
            CheckoutStep::Success => "success",
            CheckoutStep::Failed => "failed",
        }
    }
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CheckoutStep {
    type Err = UnknownStep;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cart" => Ok(CheckoutStep::Cart),
            "shipping" => Ok(CheckoutStep::Shipping),
            "payment" => Ok(CheckoutStep::Payment),
            "review" | "placeorder" => Ok(CheckoutStep::Review),
            "submitting" => Ok(CheckoutStep::Submitting),
            "success" => Ok(CheckoutStep::Success),
            "failed" => Ok(CheckoutStep::Failed),
            _ => Err(UnknownStep(s.to_string())),
        }
    }
}

/// A step name that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown checkout step: {0}")]
pub struct UnknownStep(pub String);
