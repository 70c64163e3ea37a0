pub mod controller;
pub mod form;
pub mod router;
pub mod service;
