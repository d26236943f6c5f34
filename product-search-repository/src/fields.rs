//! Field names of the product index mapping used to build queries and aggregations.

pub const NAME: &str = "name";
pub const NAME_SHINGLES: &str = "name.shingles";
pub const BRAND: &str = "brand";
pub const BRAND_SHINGLES: &str = "brand.shingles";
pub const BRAND_KEYWORD: &str = "brand.keyword";
pub const PRICE: &str = "price";

/// Path of the nested SKU objects.
pub const SKUS: &str = "skus";
pub const SKU_SIZE: &str = "skus.size";
pub const SKU_COLOR: &str = "skus.color";

pub const SCORE: &str = "_score";
pub const DOC_ID: &str = "_id";
