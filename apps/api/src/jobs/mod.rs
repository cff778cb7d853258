// Persistence side of the pipeline: record normalization, the store seam, and
// the URL-keyed deduplicating writer.

pub mod dedup;
pub mod normalize;
pub mod store;
