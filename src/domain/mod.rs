mod customer;
mod inventory;
mod maintenance;
mod money;
pub mod schema;
mod trip;

pub use customer::*;
pub use inventory::*;
pub use maintenance::*;
pub use money::*;
pub use schema::{EntitySchema, FieldValue, OrderBy, Record, RecordId, ValidationError};
pub use trip::*;
