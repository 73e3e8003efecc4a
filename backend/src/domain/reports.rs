//! Inventory reports computed from product listings.

use serde::Serialize;
use utoipa::ToSchema;

use super::Product;

/// Default `quantity` threshold for the low stock report.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 5;

/// Aggregate view of the whole inventory.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_products: usize,
    pub total_quantity: i64,
    pub total_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_value_product: Option<Product>,
}

impl InventorySummary {
    /// Summarise `products`. The highest value product maximises
    /// `price * quantity`; the first one wins on ties.
    ///
    /// # Examples
    /// ```
    /// use inventory::domain::InventorySummary;
    ///
    /// let summary = InventorySummary::from_products(&[]);
    /// assert_eq!(summary.total_products, 0);
    /// assert!(summary.highest_value_product.is_none());
    /// ```
    #[must_use]
    pub fn from_products(products: &[Product]) -> Self {
        let highest_value_product = products
            .iter()
            .fold(None::<&Product>, |best, candidate| match best {
                Some(current) if current.total_value() >= candidate.total_value() => Some(current),
                _ => Some(candidate),
            })
            .cloned();
        Self {
            total_products: products.len(),
            total_quantity: products.iter().map(|p| i64::from(p.quantity)).sum(),
            total_value: products.iter().map(Product::total_value).sum(),
            highest_value_product,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewProduct, ProductDraft};
    use rstest::rstest;

    fn product(id: i32, quantity: i32, price: f64) -> Product {
        let draft = ProductDraft {
            product_id: Some(id),
            product_name: Some(format!("item-{id}")),
            quantity: Some(quantity),
            price: Some(price),
            ..ProductDraft::default()
        };
        Product::from_new(NewProduct::try_from(draft).expect("valid product"), None)
    }

    #[rstest]
    fn summary_totals_and_highest_value() {
        let products = vec![product(1, 2, 10.0), product(2, 10, 5.0), product(3, 1, 1.0)];
        let summary = InventorySummary::from_products(&products);
        assert_eq!(summary.total_products, 3);
        assert_eq!(summary.total_quantity, 13);
        assert!((summary.total_value - 71.0).abs() < 1e-9);
        assert_eq!(
            summary.highest_value_product.map(|p| p.id.get()),
            Some(2)
        );
    }

    #[rstest]
    fn ties_keep_the_first_product() {
        let products = vec![product(1, 2, 5.0), product(2, 1, 10.0)];
        let summary = InventorySummary::from_products(&products);
        assert_eq!(summary.highest_value_product.map(|p| p.id.get()), Some(1));
    }

    #[rstest]
    fn summary_serialises_camel_case() {
        let value = serde_json::to_value(InventorySummary::from_products(&[product(1, 1, 1.0)]))
            .expect("serialise summary");
        assert_eq!(value["totalProducts"], 1);
        assert_eq!(value["highestValueProduct"]["product_id"], 1);
    }
}
