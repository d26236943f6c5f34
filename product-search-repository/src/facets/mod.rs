//! Facet aggregations over the matched product set.

mod aggregator;

pub use aggregator::{
    capitalize, FacetAggregator, PriceRange, BRAND_FACET, COLOR_FACET, DEFAULT_BUCKET_LIMIT,
    PRICE_FACET, PRICE_RANGES, SIZE_FACET,
};
