//! Value objects for the checkout domain.

use common::ProductId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Money amount represented in cents to avoid floating point issues.
///
/// On the wire and in storage an amount is a JSON number with at most two
/// decimals (`19.99`). Strings holding a number (`"19.99"`) are accepted when
/// reading, since the storefront has historically sent formatted prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    /// Amount in cents (e.g., 1000 = $10.00)
    cents: i64,
}

impl Money {
    /// Largest amount a price, line or order may reach: $1,000,000,000,000.00.
    pub const LIMIT: Money = Money::from_cents(100_000_000_000_000);

    /// Creates a new Money amount from cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Creates a new Money amount from a dollar value.
    pub const fn from_dollars(dollars: i64) -> Self {
        Self {
            cents: dollars * 100,
        }
    }

    /// Creates a Money amount from a decimal value, rounding to the nearest cent.
    ///
    /// Returns `None` for values that are not finite or do not fit in cents.
    pub fn from_decimal(amount: f64) -> Option<Self> {
        let cents = (amount * 100.0).round();
        if !cents.is_finite() || cents.abs() > i64::MAX as f64 / 2.0 {
            return None;
        }
        Some(Self {
            cents: cents as i64,
        })
    }

    /// Returns zero money.
    pub const fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the dollar portion (whole number).
    pub fn dollars(&self) -> i64 {
        self.cents / 100
    }

    /// Returns the cents portion (remainder after dollars).
    pub fn cents_part(&self) -> i64 {
        self.cents.abs() % 100
    }

    /// Returns the amount as a decimal number of dollars.
    pub fn as_decimal(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.cents < 0
    }

    /// Returns true if the amount's magnitude does not exceed [`Money::LIMIT`].
    pub fn is_within_limit(&self) -> bool {
        self.cents.unsigned_abs() <= Self::LIMIT.cents.unsigned_abs()
    }

    /// Multiplies by a quantity, saturating at the `i64` bounds.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money {
            cents: self.cents.saturating_mul(i64::from(quantity)),
        }
    }

    /// Multiplies by a quantity, or `None` on overflow.
    pub fn checked_multiply(&self, quantity: u32) -> Option<Money> {
        self.cents
            .checked_mul(i64::from(quantity))
            .map(Money::from_cents)
    }

    /// Adds two amounts, or `None` on overflow.
    pub fn checked_add(&self, rhs: Money) -> Option<Money> {
        self.cents.checked_add(rhs.cents).map(Money::from_cents)
    }

    /// Applies a rate given in basis points (1500 = 15%), rounding half away
    /// from zero to the nearest cent.
    pub fn apply_rate_bps(&self, bps: u32) -> Money {
        let scaled = i128::from(self.cents) * i128::from(bps);
        let half = 5_000i128;
        let rounded = if scaled >= 0 {
            (scaled + half) / 10_000
        } else {
            (scaled - half) / 10_000
        };
        let cents = i64::try_from(rounded).unwrap_or(if rounded < 0 {
            i64::MIN
        } else {
            i64::MAX
        });
        Money { cents }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.cents < 0 {
            write!(f, "-${}.{:02}", self.dollars().abs(), self.cents_part())
        } else {
            write!(f, "${}.{:02}", self.dollars(), self.cents_part())
        }
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents.saturating_add(rhs.cents),
        }
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.cents = self.cents.saturating_add(rhs.cents);
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawAmount {
            Number(f64),
            Text(String),
        }

        let amount = match RawAmount::deserialize(deserializer)? {
            RawAmount::Number(n) => n,
            RawAmount::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| serde::de::Error::custom(format!("invalid amount: {s:?}")))?,
        };

        Money::from_decimal(amount)
            .ok_or_else(|| serde::de::Error::custom(format!("amount out of range: {amount}")))
    }
}

/// A product line in the cart.
///
/// Field names follow the storefront's document format (`product`, `qty`),
/// with `productId` and `quantity` accepted when reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// The product identifier.
    #[serde(rename = "product", alias = "productId")]
    pub product_id: ProductId,

    /// Human-readable product name.
    pub name: String,

    /// Product image URL.
    #[serde(default)]
    pub image: String,

    /// Price per unit.
    pub price: Money,

    /// Quantity in the cart.
    #[serde(rename = "qty", alias = "quantity")]
    pub quantity: u32,

    /// Units available, when the catalog reported it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_in_stock: Option<u32>,
}

impl CartItem {
    /// Creates a new cart item without stock information.
    pub fn new(
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            image: String::new(),
            price,
            quantity,
            count_in_stock: None,
        }
    }

    /// Sets the image URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Sets the known stock count.
    pub fn with_stock(mut self, count_in_stock: u32) -> Self {
        self.count_in_stock = Some(count_in_stock);
        self
    }

    /// Returns the total price for this line (quantity * price).
    pub fn line_total(&self) -> Money {
        self.price.multiply(self.quantity)
    }

    /// Returns the line total, or an error when it exceeds [`Money::LIMIT`].
    pub fn checked_line_total(&self) -> Result<Money, ValidationError> {
        self.price
            .checked_multiply(self.quantity)
            .filter(Money::is_within_limit)
            .ok_or(ValidationError::AmountOutOfRange)
    }

    /// Checks the line before it enters the cart.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.product_id.is_blank() {
            return Err(ValidationError::MissingProduct);
        }

        if self.quantity == 0 {
            return Err(ValidationError::InvalidQuantity {
                quantity: self.quantity,
            });
        }

        if self.price.is_negative() {
            return Err(ValidationError::NegativePrice {
                price: self.price.cents(),
            });
        }

        self.checked_line_total()?;

        if let Some(available) = self.count_in_stock
            && self.quantity > available
        {
            return Err(ValidationError::InsufficientStock {
                product_id: self.product_id.to_string(),
                requested: self.quantity,
                available,
            });
        }

        Ok(())
    }
}

/// Where the order ships.
///
/// Every field defaults to empty so a stored `{}` reads as "not yet captured".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
}

impl ShippingAddress {
    /// Creates a shipping address.
    pub fn new(
        address: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            city: city.into(),
            postal_code: postal_code.into(),
            country: country.into(),
        }
    }

    /// Returns true once a street address has been captured.
    ///
    /// This is the check every step guard uses.
    pub fn is_present(&self) -> bool {
        !self.address.trim().is_empty()
    }

    /// Checks that every field of the shipping form is filled in.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("address", &self.address),
            ("city", &self.city),
            ("postal code", &self.postal_code),
            ("country", &self.country),
        ];

        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingAddressField { field });
            }
        }

        Ok(())
    }

    /// Returns a copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            country: self.country.trim().to_string(),
        }
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    PayPal,
    Stripe,
}

impl PaymentMethod {
    /// All supported methods, in the order the payment form lists them.
    pub const ALL: [PaymentMethod; 2] = [PaymentMethod::PayPal, PaymentMethod::Stripe];

    /// Returns the method name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::PayPal => "PayPal",
            PaymentMethod::Stripe => "Stripe",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownPaymentMethod(trimmed.to_string()))
    }
}

/// The logged-in user, as issued by the auth service.
///
/// Only `token` matters to checkout: it authenticates order submission.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub token: String,
}

impl UserInfo {
    /// Returns the bearer token, if one was issued.
    pub fn bearer_token(&self) -> Option<&str> {
        let token = self.token.trim();
        (!token.is_empty()).then_some(token)
    }
}

impl std::fmt::Debug for UserInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserInfo")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("is_admin", &self.is_admin)
            .field("token", &"<redacted>")
            .finish()
    }
}
