pub mod admin;
pub mod availability;
pub mod booking;
pub mod calendar;
pub mod common;
pub mod contact;
pub mod coupon;
pub mod pagination;
pub mod review;
pub mod room;
pub mod settings;
pub mod upsell;

pub use admin::*;
pub use availability::*;
pub use booking::*;
pub use calendar::*;
pub use common::*;
pub use contact::*;
pub use coupon::*;
pub use pagination::*;
pub use review::*;
pub use room::*;
pub use settings::*;
pub use upsell::*;
