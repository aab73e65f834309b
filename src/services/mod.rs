pub mod form_service;
pub mod static_service;
