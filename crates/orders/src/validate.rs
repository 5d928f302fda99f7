//! Request validation, run before any lock is taken.

use common::ObjectId;
use domain::ItemKind;
use payment::Card;

use crate::{NewOrder, OrderServiceError, Result};

/// Checks that `id` is a well-formed object id.
pub fn object_id(kind: &str, id: &str) -> Result<()> {
    ObjectId::parse(id)
        .map(|_| ())
        .map_err(|_| OrderServiceError::InvalidInput(format!("invalid {kind} id: {id:?}")))
}

/// Checks the fields of a new order.
pub fn new_order(new: &NewOrder) -> Result<()> {
    let email = new.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(OrderServiceError::InvalidInput(format!(
            "invalid email: {:?}",
            new.email
        )));
    }

    if new.items.is_empty() {
        return Err(OrderServiceError::InvalidInput(
            "order must have at least one item".to_string(),
        ));
    }

    for item in &new.items {
        match (item.kind, item.parent.as_deref()) {
            (ItemKind::Sku, Some(parent)) => object_id("sku", parent)?,
            (ItemKind::Sku, None) => {
                return Err(OrderServiceError::InvalidInput(
                    "sku item is missing its parent".to_string(),
                ));
            }
            (_, Some(_)) => {
                return Err(OrderServiceError::InvalidInput(format!(
                    "{:?} item cannot have a parent",
                    item.kind
                )));
            }
            (_, None) => {}
        }
    }

    Ok(())
}

/// Checks that a card carries every field a charge needs.
pub fn card(card: &Card) -> Result<()> {
    if !card.is_complete() {
        return Err(OrderServiceError::InvalidInput(
            "card number, expiry and cvc are required".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Currency, OrderItem, Shipping};

    fn new_order_with(email: &str, items: Vec<OrderItem>) -> NewOrder {
        NewOrder {
            email: email.to_string(),
            currency: Currency::Usd,
            items,
            shipping: Shipping::default(),
        }
    }

    fn sku_item() -> OrderItem {
        OrderItem::sku(ObjectId::new().to_string(), 1, Currency::Usd)
    }

    #[test]
    fn test_object_id() {
        assert!(object_id("order", &ObjectId::new().to_string()).is_ok());
        assert!(matches!(
            object_id("order", "nope"),
            Err(OrderServiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_valid_new_order() {
        let new = new_order_with(
            "buyer@example.com",
            vec![sku_item(), OrderItem::tax(10, Currency::Usd)],
        );
        assert!(new_order(&new).is_ok());
    }

    #[test]
    fn test_new_order_requires_email() {
        assert!(new_order(&new_order_with("", vec![sku_item()])).is_err());
        assert!(new_order(&new_order_with("buyer", vec![sku_item()])).is_err());
    }

    #[test]
    fn test_new_order_requires_items() {
        assert!(new_order(&new_order_with("a@b.c", vec![])).is_err());
    }

    #[test]
    fn test_sku_item_parent_must_be_an_id() {
        let bad = OrderItem::sku("not-a-uuid", 1, Currency::Usd);
        assert!(new_order(&new_order_with("a@b.c", vec![bad])).is_err());

        let mut orphan = sku_item();
        orphan.parent = None;
        assert!(new_order(&new_order_with("a@b.c", vec![orphan])).is_err());
    }

    #[test]
    fn test_card_fields_required() {
        assert!(card(&Card::new("4242424242424242", 12, 2030, "123")).is_ok());
        assert!(card(&Card::new("4242424242424242", 0, 2030, "123")).is_err());
    }
}
