pub mod call;
pub mod entity;
pub mod member;

pub use call::{FunctionCall, Resolution};
pub use entity::{fingerprint_of, CodeEntity, EntityKind, Metadata};
pub use member::{ArrayDimension, StructMember};
