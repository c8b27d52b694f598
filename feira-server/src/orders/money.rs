//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` (rounded to 2 decimal places) for storage/serialization.

use crate::orders::manager::OrderError;
use rust_decimal::prelude::*;
use shared::order::DraftLine;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed price per unit (R$1,000,000)
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
const MAX_QUANTITY: i32 = 9999;
/// Maximum allowed delivery fee (R$10,000)
const MAX_DELIVERY_FEE: f64 = 10_000.0;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), OrderError> {
    if !value.is_finite() {
        return Err(OrderError::Validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate a DraftLine before processing
pub fn validate_draft_line(line: &DraftLine) -> Result<(), OrderError> {
    if line.product_name.trim().is_empty() {
        return Err(OrderError::Validation(
            "product_name must not be empty".to_string(),
        ));
    }
    if line.unit_label.trim().is_empty() {
        return Err(OrderError::Validation(
            "unit_label must not be empty".to_string(),
        ));
    }

    // Price must be finite and non-negative
    require_finite(line.unit_price, "unit_price")?;
    if line.unit_price < 0.0 {
        return Err(OrderError::Validation(format!(
            "unit_price must be non-negative, got {}",
            line.unit_price
        )));
    }
    if line.unit_price > MAX_PRICE {
        return Err(OrderError::Validation(format!(
            "unit_price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, line.unit_price
        )));
    }

    // Quantity must be positive and within bounds
    if line.quantity <= 0 {
        return Err(OrderError::Validation(format!(
            "quantity must be positive, got {}",
            line.quantity
        )));
    }
    if line.quantity > MAX_QUANTITY {
        return Err(OrderError::Validation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, line.quantity
        )));
    }

    Ok(())
}

/// Validate the delivery fee before processing
pub fn validate_delivery_fee(fee: f64) -> Result<(), OrderError> {
    require_finite(fee, "delivery_fee")?;
    if fee < 0.0 {
        return Err(OrderError::Validation(format!(
            "delivery_fee must be non-negative, got {}",
            fee
        )));
    }
    if fee > MAX_DELIVERY_FEE {
        return Err(OrderError::Validation(format!(
            "delivery_fee exceeds maximum allowed ({}), got {}",
            MAX_DELIVERY_FEE, fee
        )));
    }
    Ok(())
}

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Line total with precise decimal arithmetic: unit_price * quantity
pub fn line_total(line: &DraftLine) -> Decimal {
    let unit_price = to_decimal(line.unit_price);
    let quantity = Decimal::from(line.quantity);
    (unit_price * quantity)
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Order subtotal: sum of line totals
pub fn subtotal(lines: &[DraftLine]) -> Decimal {
    lines.iter().map(line_total).sum()
}

/// Compare two monetary values for equality (within 0.01 tolerance)
pub fn money_eq(a: f64, b: f64) -> bool {
    let diff = (to_decimal(a) - to_decimal(b)).abs();
    diff < MONEY_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: i32, unit_price: f64) -> DraftLine {
        DraftLine {
            merchant_id: 1,
            product_name: "Item".to_string(),
            quantity,
            unit_label: "un".to_string(),
            unit_price,
        }
    }

    #[test]
    fn test_to_decimal_precision() {
        // Classic floating point problem: 0.1 + 0.2 != 0.3
        let a = 0.1_f64;
        let b = 0.2_f64;
        let sum_f64 = a + b;

        // f64 fails
        assert_ne!(sum_f64, 0.3);

        // Decimal succeeds
        let sum_dec = to_decimal(a) + to_decimal(b);
        assert_eq!(to_f64(sum_dec), 0.3);
    }

    #[test]
    fn test_accumulation_precision() {
        // Sum 0.01 one thousand times
        let mut total = Decimal::ZERO;
        for _ in 0..1000 {
            total += to_decimal(0.01);
        }
        assert_eq!(to_f64(total), 10.0);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(to_f64(line_total(&line(3, 10.99))), 32.97);
        assert_eq!(to_f64(line_total(&line(3, 2.0))), 6.0);
    }

    #[test]
    fn test_subtotal_sums_lines() {
        let lines = vec![line(3, 2.0), line(1, 5.0)];
        assert_eq!(to_f64(subtotal(&lines)), 11.0);
    }

    #[test]
    fn test_many_small_lines() {
        // 100 lines at R$0.01 each
        let lines: Vec<DraftLine> = (0..100).map(|_| line(1, 0.01)).collect();
        assert_eq!(to_f64(subtotal(&lines)), 1.0);
    }

    #[test]
    fn test_rounding_half_up() {
        // 0.005 should round up to 0.01
        let value = Decimal::new(5, 3); // 0.005
        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        assert_eq!(rounded.to_f64().unwrap(), 0.01);

        // 0.004 should round down to 0.00
        let value2 = Decimal::new(4, 3); // 0.004
        let rounded2 = value2.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        assert_eq!(rounded2.to_f64().unwrap(), 0.0);
    }

    #[test]
    fn test_money_eq() {
        assert!(money_eq(100.0, 100.0));
        assert!(money_eq(100.004, 100.006)); // Both round to 100.00/100.01
        assert!(!money_eq(100.0, 100.02));
    }

    #[test]
    fn test_validate_draft_line_bounds() {
        assert!(validate_draft_line(&line(1, 10.0)).is_ok());
        assert!(validate_draft_line(&line(0, 10.0)).is_err());
        assert!(validate_draft_line(&line(-1, 10.0)).is_err());
        assert!(validate_draft_line(&line(MAX_QUANTITY + 1, 10.0)).is_err());
        assert!(validate_draft_line(&line(1, -1.0)).is_err());
        assert!(validate_draft_line(&line(1, f64::NAN)).is_err());
        assert!(validate_draft_line(&line(1, f64::INFINITY)).is_err());
        assert!(validate_draft_line(&line(1, MAX_PRICE + 1.0)).is_err());
    }

    #[test]
    fn test_validate_draft_line_empty_name() {
        let mut l = line(1, 10.0);
        l.product_name = "  ".to_string();
        assert!(validate_draft_line(&l).is_err());
    }

    #[test]
    fn test_validate_delivery_fee() {
        assert!(validate_delivery_fee(5.0).is_ok());
        assert!(validate_delivery_fee(0.0).is_ok());
        assert!(validate_delivery_fee(-0.01).is_err());
        assert!(validate_delivery_fee(f64::NAN).is_err());
        assert!(validate_delivery_fee(MAX_DELIVERY_FEE + 1.0).is_err());
    }

    #[test]
    fn test_to_decimal_nan_becomes_zero() {
        // NaN 被 Decimal::from_f64 拒绝，unwrap_or_default 返回 0
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
    }
}
