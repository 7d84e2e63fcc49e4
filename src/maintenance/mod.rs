//! Contract maintenance: operator queries and keeper transactions.

pub mod actions;
pub mod queries;

pub use actions::ContractActions;
pub use queries::{ContractInfo, ContractQueries};
