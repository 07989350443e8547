use clap::Subcommand;
use focusdeck_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value by dot-separated key (e.g. remote.base_url)
    Get { key: String },
    /// Set one value by dot-separated key and persist
    Set { key: String, value: String },
    /// Print the whole configuration as JSON
    List,
    /// Print the configuration file path
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown config key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            println!("{key} = {value}");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
    }
    Ok(())
}
