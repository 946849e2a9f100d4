pub mod affiliate_service;
pub mod checkout_service;
pub mod discount_service;
pub mod settlement;
pub mod user_service;
pub mod withdrawal_service;

pub use affiliate_service::*;
pub use checkout_service::*;
pub use discount_service::*;
pub use user_service::*;
pub use withdrawal_service::*;
