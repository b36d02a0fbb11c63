pub mod account;
pub mod errors;
pub mod invoice;
pub mod outcome;
pub mod ports;
