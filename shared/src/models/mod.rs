//! Data models
//!
//! Entities as the backend serves them. IDs are opaque strings and field
//! names are camelCase on the wire.

pub mod certificate;
pub mod contribution;
pub mod donation;
pub mod member;
pub mod notice;
pub mod operator;
pub mod receipt;
pub mod registration;

// Re-exports
pub use certificate::*;
pub use contribution::*;
pub use donation::*;
pub use member::*;
pub use notice::*;
pub use operator::*;
pub use receipt::*;
pub use registration::*;
