// Service exports
pub mod sheet;
pub mod store;

pub use sheet::{SheetClient, SheetError};
pub use store::AnkenStore;
