//! CLI commands implementation

pub mod init;
pub mod status;
pub mod validate;

pub use init::*;
pub use status::*;
pub use validate::*;
