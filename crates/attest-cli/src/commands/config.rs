//! Config command implementation.

use crate::cli::ConfigArgs;
use crate::config::Config;
use crate::error::Result;

/// Execute the config command.
pub fn execute_config(args: ConfigArgs, config: &Config) -> Result<()> {
    if args.path {
        println!("{}", Config::path()?.display());
    } else {
        print!("{}", config.to_toml()?);
    }
    Ok(())
}
