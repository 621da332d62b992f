pub mod admin_sessions;
pub mod blocked_dates;
pub mod bookings;
pub mod contact_messages;
pub mod coupons;
pub mod custom_prices;
pub mod payment_transactions;
pub mod reviews;
pub mod rooms;
pub mod settings;
pub mod upsells;

pub use admin_sessions as admin_session_entity;
pub use blocked_dates as blocked_date_entity;
pub use bookings as booking_entity;
pub use contact_messages as contact_message_entity;
pub use coupons as coupon_entity;
pub use custom_prices as custom_price_entity;
pub use payment_transactions as payment_transaction_entity;
pub use reviews as review_entity;
pub use rooms as room_entity;
pub use settings as settings_entity;
pub use upsells as upsell_entity;

pub use bookings::{BookingStatus, PaymentStatus};
pub use coupons::DiscountType;
pub use payment_transactions::TransactionStatus;
