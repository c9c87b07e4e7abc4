use std::fs;
use std::path::PathBuf;

use clap::Args;
use rand::rngs::OsRng;

use common::crypto::DEFAULT_MR_ROUNDS;
use common::prelude::{DhError, Group, NamedGroup};

#[derive(Args, Debug, Clone)]
pub struct Show {
    /// PEM file holding DH PARAMETERS
    pub path: PathBuf,

    /// Miller-Rabin rounds for the primality checks
    #[arg(long, default_value_t = DEFAULT_MR_ROUNDS)]
    pub rounds: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ParamsShowError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid parameters: {0}")]
    Dh(#[from] DhError),
}

impl crate::cli::op::Op for Show {
    type Error = ParamsShowError;
    type Output = String;

    fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let pem = fs::read_to_string(&self.path)?;
        let group = Group::from_pem(&pem)?;
        let check = group.check(self.rounds, &mut OsRng)?;

        let known = NamedGroup::ALL
            .iter()
            .find(|name| *name.group() == group)
            .map(|name| name.to_string())
            .unwrap_or_else(|| "none".to_string());

        let yes_no = |ok: bool| if ok { "yes" } else { "NO" };
        let lines = [
            group.to_string(),
            String::new(),
            format!("well-known group:       {}", known),
            format!("prime:                  {}", yes_no(check.prime)),
            format!("safe prime:             {}", yes_no(check.safe_prime)),
            format!(
                "generator in subgroup:  {}",
                yes_no(check.generator_in_subgroup)
            ),
        ];

        if !check.is_sound() {
            tracing::warn!(path = %self.path.display(), "dh parameters failed soundness checks");
        }

        Ok(lines.join("\n"))
    }
}
