pub mod affiliates;
pub mod bank_profiles;
pub mod discount_instruments;
pub mod order_co_authors;
pub mod order_items;
pub mod orders;
pub mod users;
pub mod withdraw_requests;

pub use affiliates as affiliate_entity;
pub use bank_profiles as bank_profile_entity;
pub use discount_instruments as discount_instrument_entity;
pub use order_co_authors as order_co_author_entity;
pub use order_items as order_item_entity;
pub use orders as order_entity;
pub use users as user_entity;
pub use withdraw_requests as withdraw_request_entity;
