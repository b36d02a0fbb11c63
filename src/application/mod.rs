pub mod invoice_controller;
pub mod invoice_service;
pub mod session;
