//! Exact integer money arithmetic.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

/// Supported currencies. Fares from the pricing API are quoted in euros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Eur,
}

/// A rational multiplier applied to fares (e.g. 3/5 for a 40% discount).
///
/// Discount factors are kept as integer ratios so that scaled fares stay
/// exact up to a single final rounding step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rate {
    num: u32,
    den: u32,
}

impl Rate {
    /// Full fare, no discount.
    pub const FULL: Rate = Rate { num: 1, den: 1 };

    /// Zero fare (counted but not priced).
    pub const FREE: Rate = Rate { num: 0, den: 1 };

    /// Create a rate. The denominator must be non-zero.
    pub const fn new(num: u32, den: u32) -> Self {
        assert!(den != 0, "rate denominator must be non-zero");
        Rate { num, den }
    }
}

/// An amount of money in minor currency units (euro cents).
///
/// All arithmetic is exact integer arithmetic; scaling by a [`Rate`]
/// rounds half-to-even. There is no floating point anywhere in a money
/// computation, so repeated accumulation cannot drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Money {
    cents: i64,
    currency: Currency,
}

impl Money {
    /// An amount of euros expressed in cents.
    pub const fn eur(cents: i64) -> Self {
        Money {
            cents,
            currency: Currency::Eur,
        }
    }

    /// The amount in minor units.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// The currency of this amount.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Multiply by a rational rate, rounding half-to-even.
    pub fn scale_round(self, rate: Rate) -> Money {
        let negative = self.cents < 0;
        let scaled = self.cents.unsigned_abs() as u128 * rate.num as u128;
        let den = rate.den as u128;

        let quotient = scaled / den;
        let remainder = scaled % den;
        let rounded = match (remainder * 2).cmp(&den) {
            Ordering::Less => quotient,
            Ordering::Greater => quotient + 1,
            Ordering::Equal => {
                if quotient % 2 == 0 {
                    quotient
                } else {
                    quotient + 1
                }
            }
        };

        let cents = rounded as i64;
        Money {
            cents: if negative { -cents } else { cents },
            currency: self.currency,
        }
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        debug_assert_eq!(self.currency, other.currency, "currency mismatch");
        Money {
            cents: self.cents + other.cents,
            currency: self.currency,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.currency {
            Currency::Eur => {
                let sign = if self.cents < 0 { "-" } else { "" };
                let cents = self.cents.unsigned_abs();
                write!(f, "EUR {sign}{}.{:02}", cents / 100, cents % 100)
            }
        }
    }
}
