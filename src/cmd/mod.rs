//! Command dispatch.
//!
//! [`dispatch`] validates and exits when `--check` is given, and
//! otherwise starts the server through [`run`].

pub mod run;
pub mod validate;

use crate::cli::Cli;
use crate::error::DevserveError;

pub async fn dispatch(cli: Cli) -> Result<(), DevserveError> {
    if cli.check {
        validate::execute(&cli)
    } else {
        run::execute(&cli).await
    }
}
