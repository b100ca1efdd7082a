pub mod messenger;
pub mod payment_provider;
