use crate::config::{RebaseplanConfig, CONFIG_FILE};

/// `rebaseplan config`: print the effective configuration.
pub fn show(config: &RebaseplanConfig) -> anyhow::Result<()> {
    println!("# {CONFIG_FILE} merged with command-line overrides");
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
