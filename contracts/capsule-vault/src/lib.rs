pub mod contract;
pub mod error;
pub mod execute;
pub mod msg;
pub mod pull;
pub mod query;
pub mod state;

pub use crate::error::ContractError;
