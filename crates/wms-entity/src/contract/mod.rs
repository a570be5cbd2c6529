//! Service contract entities.

pub mod item;
pub mod model;
pub mod status;

pub use item::{
    ContractItem, ContractItemView, MAX_QUANTITY, MAX_UNIT_PRICE, NewContractItem, checked_total,
    contract_total,
};
pub use model::{Contract, ContractSummary, CreateContract, UpdateContract};
pub use status::ContractStatus;
