pub mod catalog;
pub mod pax;
pub mod quote;
pub mod user;
