//! Tracked product units and their warranty coverage.

pub mod records;
pub mod service;

pub use records::{SerialRecord, load_records};
pub use service::{
    CreateSerialInput, SerialDetail, SerialService, UpdateSerialInput, WarrantyLookup,
    WarrantyLookupProduct, WarrantyRequestInput,
};
