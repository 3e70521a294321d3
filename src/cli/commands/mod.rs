//! One module per subcommand.  Each `execute` borrows the single
//! `CredentialManager` built in `main`.

pub mod cleanup;
pub mod clear;
pub mod delete;
pub mod get;
pub mod list;
pub mod refresh;
pub mod set;
pub mod status;
pub mod update;
pub mod validate;
