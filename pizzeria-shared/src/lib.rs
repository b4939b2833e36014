pub mod address;
pub mod pii;

pub use address::Address;
pub use pii::Masked;
