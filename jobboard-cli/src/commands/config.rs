use anyhow::{Context, Result};
use shared::config::ClientConfig;

/// Prints the default configuration in the given format.
///
/// # Errors
/// Returns an error if the format is unsupported.
pub fn print_default_config(format: &str) -> Result<()> {
    let rendered = ClientConfig::with_defaults()
        .render(format)
        .with_context(|| format!("cannot render configuration as `{format}`; use yaml, json or toml"))?;
    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}
