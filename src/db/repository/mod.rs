//! Patient-scoped CRUD, one module per sub-collection.
//!
//! Reads default to "most recent N" by timestamp descending. Writes are
//! either appends (new row) or merge-upserts (patient summary, sessions).
//! No transaction spans two sub-collections; a vitals append and the
//! matching summary upsert are independent writes.

pub mod activity;
pub mod agitation;
pub mod assessment;
pub mod family;
pub mod patient;
pub mod session;
pub mod user;
pub mod vitals;
