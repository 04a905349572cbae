//! Stock level classification for inventory items.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StockLevel {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl StockLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::LowStock => "Low Stock",
            Self::OutOfStock => "Out of Stock",
        }
    }
}

/// Zero on hand is out of stock; at or below the restock threshold is low.
pub fn stock_level(current_quantity: i64, restock_threshold: i64) -> StockLevel {
    if current_quantity <= 0 {
        StockLevel::OutOfStock
    } else if current_quantity <= restock_threshold {
        StockLevel::LowStock
    } else {
        StockLevel::InStock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_quantity_is_out_of_stock() {
        assert_eq!(stock_level(0, 5), StockLevel::OutOfStock);
    }

    #[test]
    fn test_below_threshold_is_low_stock() {
        assert_eq!(stock_level(3, 5), StockLevel::LowStock);
    }

    #[test]
    fn test_at_threshold_is_low_stock() {
        assert_eq!(stock_level(5, 5), StockLevel::LowStock);
    }

    #[test]
    fn test_above_threshold_is_in_stock() {
        assert_eq!(stock_level(10, 5), StockLevel::InStock);
    }

    #[test]
    fn test_labels() {
        assert_eq!(stock_level(0, 5).label(), "Out of Stock");
        assert_eq!(stock_level(3, 5).label(), "Low Stock");
        assert_eq!(stock_level(10, 5).label(), "In Stock");
    }
}
