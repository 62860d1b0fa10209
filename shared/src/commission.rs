//! Representative commission calculations
//!
//! A representative earns a fixed 1.5% commission on the base (affiliate)
//! price plus 100% of any overprice margin they add on top of it. The
//! fixed commission is always computed on the base price alone; adding
//! overprice never inflates it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed commission rate on the base price (1.5%)
pub const COMMISSION_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 3);

/// Derived commission breakdown for one proposal line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommissionQuote {
    pub base_price: Decimal,
    pub overprice_amount: Decimal,
    pub final_price: Decimal,
    pub volume: Decimal,
    pub fixed_commission: Decimal,
    pub overprice_gain: Decimal,
    pub total_gain: Decimal,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommissionError {
    #[error("base price cannot be negative")]
    NegativeBasePrice,
    #[error("final price cannot be negative")]
    NegativeFinalPrice,
    #[error("overprice cannot be negative")]
    NegativeOverprice,
    #[error("volume cannot be negative")]
    NegativeVolume,
}

/// Full gain breakdown from a base price plus representative overprice
///
/// Invariant: `total_gain == fixed_commission + overprice_gain`, with the
/// fixed part computed on `base_price` only.
pub fn representative_gain(
    base_price: Decimal,
    overprice_amount: Decimal,
    volume: Decimal,
) -> Result<CommissionQuote, CommissionError> {
    if base_price < Decimal::ZERO {
        return Err(CommissionError::NegativeBasePrice);
    }
    if overprice_amount < Decimal::ZERO {
        return Err(CommissionError::NegativeOverprice);
    }
    if volume < Decimal::ZERO {
        return Err(CommissionError::NegativeVolume);
    }

    let final_price = base_price + overprice_amount;
    let fixed_commission = base_price * COMMISSION_RATE * volume;
    let overprice_gain = overprice_amount * volume;

    Ok(CommissionQuote {
        base_price,
        overprice_amount,
        final_price,
        volume,
        fixed_commission,
        overprice_gain,
        total_gain: fixed_commission + overprice_gain,
    })
}

/// Fixed commission computed directly off a blended final price
///
/// Used when only the final client price is known and the base/overprice
/// split is not. Not interchangeable with [`representative_gain`], which
/// computes the fixed part off the base price.
pub fn fixed_commission_only(
    final_price: Decimal,
    volume: Decimal,
) -> Result<Decimal, CommissionError> {
    if final_price < Decimal::ZERO {
        return Err(CommissionError::NegativeFinalPrice);
    }
    if volume < Decimal::ZERO {
        return Err(CommissionError::NegativeVolume);
    }
    Ok(final_price * COMMISSION_RATE * volume)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worked_example() {
        // base 100.00, overprice 20.00, volume 500
        let quote = representative_gain(
            Decimal::from(100),
            Decimal::from(20),
            Decimal::from(500),
        )
        .unwrap();
        assert_eq!(quote.final_price, Decimal::from(120));
        assert_eq!(quote.fixed_commission, Decimal::from(750));
        assert_eq!(quote.overprice_gain, Decimal::from(10_000));
        assert_eq!(quote.total_gain, Decimal::from(10_750));
    }

    #[test]
    fn test_fixed_commission_ignores_overprice() {
        let without = representative_gain(Decimal::from(100), Decimal::ZERO, Decimal::from(500))
            .unwrap();
        let with = representative_gain(Decimal::from(100), Decimal::from(50), Decimal::from(500))
            .unwrap();
        assert_eq!(without.fixed_commission, with.fixed_commission);
    }

    #[test]
    fn test_gain_invariant() {
        let quote = representative_gain(
            Decimal::new(12345, 2),
            Decimal::new(789, 2),
            Decimal::from(37),
        )
        .unwrap();
        assert_eq!(
            quote.total_gain,
            quote.fixed_commission + quote.overprice_gain
        );
    }

    #[test]
    fn test_zero_volume_earns_nothing() {
        let quote =
            representative_gain(Decimal::from(100), Decimal::from(20), Decimal::ZERO).unwrap();
        assert_eq!(quote.total_gain, Decimal::ZERO);
    }

    #[test]
    fn test_fixed_commission_only_uses_final_price() {
        // The two entry points intentionally disagree when overprice > 0:
        // one rates the base price, the other the blended final price.
        let split = representative_gain(Decimal::from(100), Decimal::from(20), Decimal::from(500))
            .unwrap();
        let blended = fixed_commission_only(split.final_price, Decimal::from(500)).unwrap();
        assert_eq!(blended, Decimal::from(900));
        assert_ne!(blended, split.fixed_commission);
    }

    #[test]
    fn test_negative_inputs_rejected() {
        assert_eq!(
            representative_gain(Decimal::from(-1), Decimal::ZERO, Decimal::ONE),
            Err(CommissionError::NegativeBasePrice)
        );
        assert_eq!(
            representative_gain(Decimal::ONE, Decimal::from(-1), Decimal::ONE),
            Err(CommissionError::NegativeOverprice)
        );
        assert_eq!(
            fixed_commission_only(Decimal::from(-1), Decimal::ONE),
            Err(CommissionError::NegativeFinalPrice)
        );
    }
}
