pub(crate) mod admin;
pub(crate) mod error_message_erasure;
pub(crate) mod health;
pub(crate) mod products;
pub(crate) mod references;
