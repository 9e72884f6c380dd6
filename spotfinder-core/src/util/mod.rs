pub mod recency;
pub mod validate;
