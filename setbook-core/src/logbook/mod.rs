//! Logbook facade over the catalog and workout store.
//!
//! `Logbook` owns the connection pool and groups every operation a transport
//! layer needs as methods.

mod catalog;
mod logbook;
mod sets;
mod workout;

pub use logbook::Logbook;
