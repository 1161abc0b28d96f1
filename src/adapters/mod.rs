pub mod diagnostics;
pub mod http;
pub mod issuer;
pub mod persistence;
