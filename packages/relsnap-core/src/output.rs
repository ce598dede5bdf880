use std::path::PathBuf;

use crate::error::{CoreError, Result};

pub const STDOUT_SENTINEL: &str = "-";

/// Where the rendered snapshot goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some(STDOUT_SENTINEL) | Some("") => OutputTarget::Stdout,
            Some(path) => OutputTarget::File(PathBuf::from(path)),
        }
    }
}

/// Writes `content` to the target; stdout gets a trailing newline.
pub fn write_output(content: &str, target: &OutputTarget) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            println!("{}", content);
            Ok(())
        }
        OutputTarget::File(path) => {
            std::fs::write(path, content).map_err(|source| CoreError::Write {
                path: path.clone(),
                source,
            })?;
            tracing::info!("wrote snapshot to {}", path.display());
            Ok(())
        }
    }
}
