// Application layer: the ledgers, the derived views, and the service that
// ties them to one store.

mod customers;
mod driver_payments;
pub mod error;
mod inventory;
mod ledger;
pub mod reporting;
mod service;

pub use customers::*;
pub use driver_payments::*;
pub use error::*;
pub use inventory::*;
pub use ledger::*;
pub use reporting::*;
pub use service::*;
