// Service exports
pub mod rfq;

pub use rfq::{ApiResponse, RfqClient, RfqError};
