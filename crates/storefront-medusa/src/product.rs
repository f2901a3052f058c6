//! Product-level pricing: cheapest variant and selected variant.

use storefront_core::NormalizedPrice;

use crate::error::ProductError;
use crate::normalize::normalize_variant;
use crate::types::StoreProduct;

/// Prices derived from a product's variants.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPrice {
    /// Lowest-priced variant that has any discoverable price.
    pub cheapest: Option<NormalizedPrice>,
    /// The variant requested by id or SKU, if any was requested and found
    /// with a price.
    pub selected: Option<NormalizedPrice>,
}

impl ProductPrice {
    /// The price to show: the selected variant's, else the cheapest.
    #[must_use]
    pub fn display(&self) -> Option<&NormalizedPrice> {
        self.selected.as_ref().or(self.cheapest.as_ref())
    }

    #[must_use]
    pub fn into_display(self) -> Option<NormalizedPrice> {
        self.selected.or(self.cheapest)
    }
}

/// Normalizes every variant of `product` and picks the cheapest and the
/// selected one.
///
/// `variant_id` matches a variant's `id` or its `sku`.
///
/// # Errors
///
/// Returns [`ProductError::MissingId`] if the product has no id.
pub fn product_price(
    product: &StoreProduct,
    variant_id: Option<&str>,
    default_currency: Option<&str>,
) -> Result<ProductPrice, ProductError> {
    if product.id.as_deref().is_none_or(|id| id.trim().is_empty()) {
        return Err(ProductError::MissingId);
    }

    let cheapest = product
        .variants
        .iter()
        .filter_map(|v| normalize_variant(v, default_currency))
        .fold(None::<NormalizedPrice>, |best, candidate| match best {
            Some(b) if b.calculated_amount <= candidate.calculated_amount => Some(b),
            _ => Some(candidate),
        });

    let selected = variant_id.and_then(|wanted| {
        product
            .variants
            .iter()
            .find(|v| v.id.as_deref() == Some(wanted) || v.sku.as_deref() == Some(wanted))
            .and_then(|v| normalize_variant(v, default_currency))
    });

    Ok(ProductPrice { cheapest, selected })
}
