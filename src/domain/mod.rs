//! Booking rules that never touch the database.
//!
//! Services load rows, hand them to these functions and persist the result,
//! which keeps price and availability arithmetic testable in isolation.

pub mod availability;
pub mod lifecycle;
pub mod pricing;
pub mod stay;

pub use availability::*;
pub use lifecycle::*;
pub use pricing::*;
pub use stay::*;
