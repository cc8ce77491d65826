pub mod analytics;
pub mod checkout;
