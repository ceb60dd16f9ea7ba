//! Database operations for `products` and the tables that make up the rest
//! of the aggregate: descriptions, attributes, variants, availabilities,
//! prices, images and category links.

mod read;
mod types;
mod write;

pub use read::{find_product, find_product_id_by_sku, sku_exists};
pub use types::{
    AttributeRow, AvailabilityRow, ImageRow, OptionRow, OptionValueRow, PriceDescriptionRow,
    PriceRow, ProductDescriptionRow, ProductRow, VariantRow,
};
pub use write::{delete_product, save_product};
