//! # Money Module
//!
//! Monetary values, tax rates, and discounts for Zarape POS.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In binary floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  The remote document store records prices as decimal pesos, and     │
//! │  the legacy app summed them as doubles. Totals computed that way    │
//! │  can differ between devices by a centavo or two.                    │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Centavos                                     │
//! │    $850.00 is stored as 85000. Addition, quantity multiplication    │
//! │    and rate application are exact; rounding happens once, in one    │
//! │    documented place, identically on every device.                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rates follow the same rule: [`TaxRate`] and [`Discount`] are basis
//! points (1600 bps = 16%), never fractional floats. The fraction form
//! (`0.16`) exists only on the wire; conversion happens at the document
//! boundary in `zarape-store`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (the smallest MXN unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: negative values appear on returns and adjustments
/// - **Single-field tuple struct**: zero-cost abstraction over i64
/// - **Serde transparent**: serializes as a plain integer
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ```rust
    /// use zarape_core::Money;
    ///
    /// let price = Money::from_cents(85000); // $850.00
    /// assert_eq!(price.cents(), 85000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal peso amount (wire form) into centavos.
    ///
    /// Rounds to the nearest centavo. Only the document boundary should
    /// call this; everything inside the engine stays integral.
    #[inline]
    pub fn from_pesos(pesos: f64) -> Self {
        Money((pesos * 100.0).round() as i64)
    }

    /// Returns the decimal peso amount (wire form).
    #[inline]
    pub fn to_pesos(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-peso portion.
    #[inline]
    pub const fn pesos_part(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavo portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a line quantity.
    ///
    /// ```rust
    /// use zarape_core::Money;
    ///
    /// let unit = Money::from_cents(45000); // $450.00
    /// assert_eq!(unit.multiply_quantity(3).cents(), 135000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Calculates tax on this amount at the given rate.
    ///
    /// Uses half-up integer rounding via an i128 intermediate:
    /// `(cents × bps + 5000) / 10000`. At cent-exact inputs (the common
    /// retail case) the result is exact.
    ///
    /// ```rust
    /// use zarape_core::{Money, TaxRate};
    ///
    /// let subtotal = Money::from_cents(20000);       // $200.00
    /// let tax = subtotal.calculate_tax(TaxRate::IVA); // 16%
    /// assert_eq!(tax.cents(), 3200);                 // $32.00
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Applies a percentage discount, returning the remaining amount.
    ///
    /// ```rust
    /// use zarape_core::{Discount, Money};
    ///
    /// let gross = Money::from_cents(5000);              // $50.00
    /// let ten_off = Discount::from_bps(1000).unwrap();  // 10%
    /// assert_eq!(gross.apply_discount(ten_off).cents(), 4500);
    /// ```
    pub fn apply_discount(&self, discount: Discount) -> Money {
        *self - self.discount_amount(discount)
    }

    /// The amount removed by a percentage discount.
    pub fn discount_amount(&self, discount: Discount) -> Money {
        let off = (self.0 as i128 * discount.bps() as i128 + 5000) / 10000;
        Money::from_cents(off as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly `$` formatting. Ticket rendering uses this too; the
/// front-end applies its own locale formatting for display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.pesos_part().abs(), self.cents_part())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summation over line items. Integer addition, so the result is the same
/// for any iteration order.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate in basis points (1 bps = 0.01%).
///
/// The wire format stores the fraction (`0.16`); internally everything is
/// basis points so rate math stays integral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(u32);

impl TaxRate {
    /// IVA, the Mexican value-added tax (16%). The catalog default.
    pub const IVA: TaxRate = TaxRate(1600);

    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Converts a wire fraction (`0.16`) into a rate.
    ///
    /// Rejects negative fractions; rates above 100% are rejected too since
    /// no sales tax works that way.
    pub fn from_fraction(fraction: f64) -> Result<Self, ValidationError> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(ValidationError::OutOfRange {
                field: "tax rate",
                min: 0,
                max: 10000,
            });
        }
        Ok(TaxRate((fraction * 10000.0).round() as u32))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the wire fraction (`0.16` for 16%).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10000.0
    }

    /// Zero tax rate (exempt products).
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// Catalog entries default to IVA unless the product says otherwise.
impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::IVA
    }
}

// =============================================================================
// Discount
// =============================================================================

/// A per-line discount in basis points, bounded to `[0, 10000]`.
///
/// Construction is fallible: a discount outside 0-100% is a caller error
/// and is rejected before it can touch a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Discount(u32);

impl Discount {
    /// No discount.
    pub const NONE: Discount = Discount(0);

    /// Creates a discount from basis points (1000 = 10%).
    pub fn from_bps(bps: u32) -> Result<Self, ValidationError> {
        if bps > 10000 {
            return Err(ValidationError::InvalidDiscount { bps: bps as i64 });
        }
        Ok(Discount(bps))
    }

    /// Converts a wire fraction (`0.1` = 10%) into a discount.
    pub fn from_fraction(fraction: f64) -> Result<Self, ValidationError> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(ValidationError::InvalidDiscount {
                bps: (fraction * 10000.0).round() as i64,
            });
        }
        Ok(Discount((fraction * 10000.0).round() as u32))
    }

    /// Returns the discount in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the wire fraction (`0.1` for 10%).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10000.0
    }

    /// Checks if this is a zero discount.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// Whole-percent display for tickets: `10%`, `0%`.
impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0 / 100)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
