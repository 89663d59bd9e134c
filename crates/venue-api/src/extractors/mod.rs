//! Custom extractors for request processing

pub mod pagination;
pub mod validated_json;

pub use pagination::ListQuery;
pub use validated_json::ValidatedJson;
