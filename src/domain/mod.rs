pub mod analytics;
pub mod cart;
pub mod checkout;
pub mod errors;
pub mod order;
pub mod ports;
