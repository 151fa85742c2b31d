//! Cart line items.
//!
//! A line item is the product record captured when it was first added to the
//! cart, flattened together with the requested `amount`. The persisted cart is
//! a JSON array of these:
//!
//! ```json
//! [{"id":1,"title":"Tênis de Caminhada","price":179.9,"image":"https://...","amount":2}]
//! ```
//!
//! Product ids are unique within a cart. That is an invariant of the cart
//! operations, not of the container, so the cart stays a plain ordered slice.

use serde::{Deserialize, Serialize};

use super::{Price, Product, ProductId};

/// A product in the cart together with its requested quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(flatten)]
    pub product: Product,
    pub amount: u32,
}

impl LineItem {
    /// A new line item holding a single unit of `product`.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self { product, amount: 1 }
    }

    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times amount.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.product.price * self.amount
    }
}

/// Read-only queries over an ordered sequence of line items.
pub trait CartItems {
    /// The line item for `product_id`, if present.
    fn find_product(&self, product_id: ProductId) -> Option<&LineItem>;

    /// Index of the line item for `product_id`, if present.
    fn position_of(&self, product_id: ProductId) -> Option<usize>;

    /// Number of distinct products in the cart.
    fn size(&self) -> usize;

    /// Sum of all line item subtotals.
    fn total(&self) -> Price;
}

impl CartItems for [LineItem] {
    fn find_product(&self, product_id: ProductId) -> Option<&LineItem> {
        self.iter().find(|item| item.product_id() == product_id)
    }

    fn position_of(&self, product_id: ProductId) -> Option<usize> {
        self.iter().position(|item| item.product_id() == product_id)
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn total(&self) -> Price {
        self.iter().map(LineItem::subtotal).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: i32, cents: i64, amount: u32) -> LineItem {
        LineItem {
            product: Product {
                id: ProductId::new(id),
                title: format!("Tênis {id}"),
                price: Price::from_cents(cents),
                image: format!("https://example.com/{id}.jpg"),
            },
            amount,
        }
    }

    #[test]
    fn test_line_item_wire_shape_is_flat() {
        let json = serde_json::to_value(item(1, 17990, 2)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "title": "Tênis 1",
                "price": 179.9,
                "image": "https://example.com/1.jpg",
                "amount": 2
            })
        );
    }

    #[test]
    fn test_cart_json_reloads_equal() {
        let cart = vec![item(1, 17990, 2), item(2, 13990, 1)];
        let json = serde_json::to_string(&cart).unwrap();
        let reloaded: Vec<LineItem> = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded, cart);
    }

    #[test]
    fn test_new_line_item_has_single_unit() {
        let line = LineItem::new(item(4, 100, 9).product);
        assert_eq!(line.amount, 1);
        assert_eq!(line.product_id(), ProductId::new(4));
    }

    #[test]
    fn test_lookup() {
        let cart = vec![item(1, 100, 1), item(5, 100, 1)];
        assert_eq!(cart.position_of(ProductId::new(5)), Some(1));
        assert_eq!(cart.position_of(ProductId::new(2)), None);
        assert_eq!(
            cart.find_product(ProductId::new(1)).map(|i| i.amount),
            Some(1)
        );
    }

    #[test]
    fn test_totals() {
        let cart = vec![item(1, 17990, 2), item(2, 13990, 1)];
        assert_eq!(cart[0].subtotal(), Price::from_cents(35980));
        assert_eq!(cart.total(), Price::from_cents(49970));
        assert_eq!(cart.size(), 2);

        let empty: Vec<LineItem> = Vec::new();
        assert_eq!(empty.total(), Price::ZERO);
    }
}
