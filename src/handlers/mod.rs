pub mod admin;
pub mod checkout;
pub mod withdrawal;

pub use admin::admin_config;
pub use checkout::checkout_config;
pub use withdrawal::withdrawal_config;
