pub mod app_error;
pub mod helpers;
pub mod picker;
pub mod ports;
pub mod use_cases;
