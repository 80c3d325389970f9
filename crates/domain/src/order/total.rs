use super::value_objects::Item;

/// Flat shipping charge added to every order.
pub const SHIPPING_SURCHARGE: f64 = 4.99;

/// Computes the amount to charge for `items`, including shipping.
///
/// Plain floating-point arithmetic; no currency rounding is applied.
pub fn compute_total(items: &[Item]) -> f64 {
    let subtotal: f64 = items.iter().map(Item::line_total).sum();
    subtotal + SHIPPING_SURCHARGE
}
