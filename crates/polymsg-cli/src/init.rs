//! Init command implementation

use crate::config::Config;
use anyhow::{Context, Result};
use std::path::Path;

const HEADER: &str = "\
# polymsg configuration
#
# schema    graphql-js AST JSON of the schema
# messages  directory searched for message documents (*.json)
# strict    exit non-zero when any message fails
#
# [backends.<id>] tables select the backends to run. Scalar overrides go in
# [scalars.<id>.<Scalar>] tables with `type`, `pattern` and `import` keys.

";

/// Write a default config to `path`
pub fn run(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{:?} already exists (use --force to overwrite)", path);
    }

    let content = format!("{HEADER}{}", Config::default().to_toml()?);
    std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

    println!("✓ Wrote {}", path.display());
    Ok(())
}
