pub mod error;
pub mod spool;
