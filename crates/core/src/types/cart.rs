//! Cart line items.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// One aggregated cart entry per unique product.
///
/// `quantity` is always at least 1; a line that would drop below that is
/// removed from the cart instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub quantity: u32,
}

impl CartLine {
    /// Start a new line with a quantity of one.
    #[must_use]
    pub fn new(product_id: ProductId, name: String, unit_price: Price) -> Self {
        Self {
            product_id,
            name,
            unit_price,
            quantity: 1,
        }
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_line_has_quantity_one() {
        let line = CartLine::new(ProductId::new("t1"), "Oak".to_string(), Price::from(100));
        assert_eq!(line.quantity, 1);
        assert_eq!(line.line_total(), Price::from(100));
    }

    #[test]
    fn test_line_total_multiplies() {
        let mut line = CartLine::new(
            ProductId::new("t2"),
            "Neem".to_string(),
            Price::parse_lenient("12.5"),
        );
        line.quantity = 3;
        assert_eq!(line.line_total().to_string(), "37.50");
    }
}
