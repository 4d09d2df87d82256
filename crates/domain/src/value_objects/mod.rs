//! Value objects: small validated types with no identity of their own.

mod slug;

pub use slug::Slug;
