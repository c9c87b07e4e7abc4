use std::convert::Infallible;

use clap::Args;

use common::prelude::NamedGroup;

/// Print the predefined groups
#[derive(Args, Debug, Clone)]
pub struct Groups;

impl crate::cli::op::Op for Groups {
    type Error = Infallible;
    type Output = String;

    fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let output = NamedGroup::ALL
            .iter()
            .map(|name| {
                let marker = if *name == ctx.config.group {
                    " (default)"
                } else {
                    ""
                };
                format!("{}{}\n{}", name, marker, name.group())
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(output)
    }
}
