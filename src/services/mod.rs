pub mod mail;
pub mod trips;
