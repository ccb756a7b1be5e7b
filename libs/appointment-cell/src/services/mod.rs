pub mod booking;
pub mod capacity;
pub mod lifecycle;
pub mod schedule;
pub mod verification;
