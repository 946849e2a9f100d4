pub mod checkout;
pub mod discount_instrument;
pub mod order;
pub mod pagination;
pub mod withdrawal;

pub use checkout::*;
pub use discount_instrument::*;
pub use order::*;
pub use pagination::*;
pub use withdrawal::*;
