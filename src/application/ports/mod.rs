pub mod diagnostics;
pub mod issuer;
pub mod user_directory;
