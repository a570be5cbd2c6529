//! Job implementations run by the scheduler.

pub mod expiry;

pub use expiry::ExpiryJob;
