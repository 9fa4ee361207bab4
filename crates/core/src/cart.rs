//! Session cart
//!
//! An insertion-ordered collection of line items keyed by product id. One
//! entry exists per product; a quantity of zero never does. The total is
//! derived from the line items on every read and is never stored, so it
//! cannot drift.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single cart entry for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product this entry refers to; unique within a cart.
    pub product_id: Uuid,

    /// Product display name at the time it was added.
    pub name: String,

    /// Price per unit. Non-negative.
    pub unit_price: Decimal,

    /// Units of the product. At least 1 while the entry exists.
    pub quantity: u32,

    /// Optional product image reference carried through for display.
    pub image_ref: Option<String>,
}

impl LineItem {
    /// Create a line item with a quantity of one.
    pub fn new(product_id: Uuid, name: impl Into<String>, unit_price: Decimal) -> Self {
        LineItem {
            product_id,
            name: name.into(),
            unit_price,
            quantity: 1,
            image_ref: None,
        }
    }

    /// Set the quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Set the image reference.
    #[must_use]
    pub fn with_image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    /// `unit_price × quantity` for this entry.
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Session-local cart.
///
/// Owned exclusively by one client session. Created empty, mutated by
/// [`add_item`](Cart::add_item) / [`update_quantity`](Cart::update_quantity) /
/// [`remove_item`](Cart::remove_item), and cleared once after a confirmed
/// order submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Add a line item, merging by product id.
    ///
    /// If the product is already in the cart its quantity is incremented by
    /// the incoming quantity, saturating at `u32::MAX`; otherwise the item
    /// is appended. Never fails.
    /// An incoming quantity of zero is ignored so that no zero-quantity
    /// entry can ever appear.
    pub fn add_item(&mut self, item: LineItem) {
        if item.quantity == 0 {
            return;
        }

        match self
            .items
            .iter_mut()
            .find(|existing| existing.product_id == item.product_id)
        {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            }
            None => self.items.push(item),
        }
    }

    /// Set the quantity for a product already in the cart.
    ///
    /// A quantity of zero removes the entry entirely, equivalent to
    /// [`remove_item`](Cart::remove_item). No-op for an absent product.
    pub fn update_quantity(&mut self, product_id: Uuid, quantity: u32) {
        if quantity == 0 {
            self.remove_item(product_id);
            return;
        }

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product_id)
        {
            item.quantity = quantity;
        }
    }

    /// Remove the entry for a product. No-op if the product is absent.
    pub fn remove_item(&mut self, product_id: Uuid) {
        self.items.retain(|item| item.product_id != product_id);
    }

    /// Empty the cart. Called after a confirmed order submission.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `unit_price × quantity` over all entries, computed fresh.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// The line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of distinct products in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Clone the line items for handoff to the submission protocol.
    ///
    /// The snapshot is taken synchronously; later cart mutations do not
    /// affect it.
    pub fn snapshot(&self) -> Vec<LineItem> {
        self.items.clone()
    }
}
