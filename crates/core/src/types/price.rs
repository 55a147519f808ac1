//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts stay as [`Decimal`] through every calculation; rounding to two
//! places happens only here, when a value is turned into display text.
//!
//! Display follows the Brazilian Portuguese conventions for the Real:
//!
//! ```rust
//! use imagine_shop_core::format_brl;
//! use rust_decimal::Decimal;
//!
//! assert_eq!(format_brl(Decimal::new(123_456, 2)), "R$ 1.234,56");
//! assert_eq!(format_brl(Decimal::new(-5, 0)), "-R$ 5,00");
//! ```

use std::num::NonZeroU32;

use num_format::{Locale, ToFormattedString};
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of interest-free installments advertised on product and cart pages.
pub const DEFAULT_INSTALLMENTS: NonZeroU32 = NonZeroU32::new(10).expect("10 is non-zero");

/// Format an amount as Brazilian reais, e.g. `R$ 1.234,56`.
///
/// Rounds half away from zero to two decimal places.
#[must_use]
pub fn format_brl(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    let cents = rounded.mantissa();
    let negative = cents < 0;
    let cents = cents.unsigned_abs();
    let reais = (cents / 100).to_formatted_string(&Locale::pt);
    let centavos = cents % 100;

    let sign = if negative { "-" } else { "" };
    format!("{sign}R$ {reais},{centavos:02}")
}

/// Split `amount` into `count` equal installments.
///
/// The result is not rounded; pass it to [`format_brl`] for display.
#[must_use]
pub fn installment(amount: Decimal, count: NonZeroU32) -> Decimal {
    amount / Decimal::from(count.get())
}
