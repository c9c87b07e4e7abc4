use std::fs;
use std::path::PathBuf;

use clap::Args;

use common::prelude::NamedGroup;

#[derive(Args, Debug, Clone)]
pub struct Export {
    /// Group to export (defaults to the configured group)
    #[arg(long)]
    pub group: Option<NamedGroup>,

    /// File to write; prints to stdout if not set
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ParamsExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl crate::cli::op::Op for Export {
    type Error = ParamsExportError;
    type Output = String;

    fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let name = self.group.unwrap_or(ctx.config.group);
        let pem = name.group().to_pem();

        match &self.out {
            Some(path) => {
                fs::write(path, &pem)?;
                tracing::info!(group = %name, path = %path.display(), "exported dh parameters");
                Ok(format!("Wrote {} parameters to {}", name, path.display()))
            }
            None => Ok(pem),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::op::{Op, OpContext};
    use common::prelude::{Group, GROUP1};
    use tempfile::TempDir;

    #[test]
    fn test_export_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("group1.pem");

        let op = Export {
            group: Some(NamedGroup::Group1),
            out: Some(path.clone()),
        };
        let output = op.execute(&OpContext::default()).unwrap();
        assert!(output.contains("group1"));

        let loaded = Group::from_pem(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, *GROUP1);
    }

    #[test]
    fn test_export_uses_configured_group() {
        let op = Export {
            group: None,
            out: None,
        };
        let output = op.execute(&OpContext::default()).unwrap();
        let loaded = Group::from_pem(&output).unwrap();
        assert_eq!(loaded.bits(), 2048);
    }
}
