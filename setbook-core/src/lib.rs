pub mod catalog;
pub mod db;
pub mod errors;
pub mod lifecycle;
pub mod logbook;
pub mod logging;

pub use errors::{Error, Result};
pub use lifecycle::Status;
pub use logbook::Logbook;
