use crate::{Currency, Money, MoneyError, OrderItem};

use super::OrderError;

/// Sums `quantity × amount` over `items` in `currency`.
///
/// The fold starts at zero in `currency`; an item in any other currency is a
/// [`OrderError::CurrencyMismatch`]. Non-positive quantities count as 1.
pub fn calculate_total(currency: Currency, items: &[OrderItem]) -> Result<i64, OrderError> {
    let mut total = Money::zero(currency);

    for item in items {
        let line = Money::new(item.amount, item.currency)
            .checked_mul(item.effective_quantity())
            .and_then(|line| total.checked_add(line));

        total = match line {
            Ok(total) => total,
            Err(MoneyError::CurrencyMismatch { expected, found }) => {
                return Err(OrderError::CurrencyMismatch { expected, found });
            }
            Err(MoneyError::Overflow) => return Err(OrderError::AmountOverflow),
        };
    }

    Ok(total.amount())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced_sku(amount: i64, quantity: i64) -> OrderItem {
        let mut item = OrderItem::sku("s", quantity, Currency::Usd);
        item.amount = amount;
        item
    }

    #[test]
    fn test_checkout_scenario_total() {
        let items = vec![
            priced_sku(1500, 2),
            OrderItem::discount(-1000, Currency::Usd),
            OrderItem::tax(50, Currency::Usd),
        ];
        assert_eq!(calculate_total(Currency::Usd, &items).unwrap(), 2050);
    }

    #[test]
    fn test_empty_items_total_zero() {
        assert_eq!(calculate_total(Currency::Eur, &[]).unwrap(), 0);
    }

    #[test]
    fn test_zero_quantity_counts_once() {
        let items = vec![priced_sku(700, 0)];
        assert_eq!(calculate_total(Currency::Usd, &items).unwrap(), 700);
    }

    #[test]
    fn test_matches_sum_of_lines() {
        let items: Vec<_> = (1..=10).map(|i| priced_sku(i * 111, i)).collect();
        let expected: i64 = (1..=10).map(|i| i * 111 * i).sum();
        assert_eq!(calculate_total(Currency::Usd, &items).unwrap(), expected);
    }

    #[test]
    fn test_mixed_currencies_fail() {
        let items = vec![priced_sku(100, 1), OrderItem::tax(5, Currency::Eur)];
        assert!(matches!(
            calculate_total(Currency::Usd, &items),
            Err(OrderError::CurrencyMismatch {
                expected: Currency::Usd,
                found: Currency::Eur
            })
        ));
    }

    #[test]
    fn test_order_currency_must_match_items() {
        let items = vec![priced_sku(100, 1)];
        assert!(calculate_total(Currency::Gbp, &items).is_err());
    }

    #[test]
    fn test_overflow_is_reported() {
        let items = vec![priced_sku(i64::MAX, 2)];
        assert!(matches!(
            calculate_total(Currency::Usd, &items),
            Err(OrderError::AmountOverflow)
        ));
    }
}
