pub mod cart_link;
pub mod normalizer;

pub use cart_link::build_cart_link;
pub use normalizer::{normalize_cart_items, QUANTITY_COLUMN, VARIANT_ID_COLUMN};
