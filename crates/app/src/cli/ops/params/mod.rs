use clap::{Args, Subcommand};

pub mod export;
pub mod show;

use crate::cli::op::Op;

crate::command_enum! {
    (Export, export::Export),
    (Show, show::Show),
}

// Rename the generated Command to ParamsCommand for clarity
pub type ParamsCommand = Command;

/// Write or inspect `DH PARAMETERS` PEM files
#[derive(Args, Debug, Clone)]
pub struct Params {
    #[command(subcommand)]
    pub command: ParamsCommand,
}

impl Op for Params {
    type Error = OpError;
    type Output = OpOutput;

    fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx)
    }
}
