use clap::{Parser, Subcommand};
use protocol::Field;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "crossell",
    version,
    about = "Insurance cross-sell prediction form"
)]
pub(crate) struct Args {
    /// TOML config; the default path may be absent.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Base URL of the prediction service, overrides the config.
    #[arg(long)]
    pub(crate) endpoint: Option<String>,
    #[arg(long, default_value = "logs")]
    pub(crate) log_dir: PathBuf,
    #[arg(long, default_value_t = false)]
    pub(crate) log_to_stderr: bool,
    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Submit the form once and print the result.
    Predict {
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        set: Vec<(Field, String)>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Ask the service which features it expects.
    Health,
}

fn parse_assignment(raw: &str) -> Result<(Field, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {raw:?}"))?;
    let field = Field::from_name(name.trim()).ok_or_else(|| {
        let known = Field::ALL
            .iter()
            .map(|field| field.name())
            .collect::<Vec<_>>()
            .join(", ");
        format!("unknown field {name:?} (expected one of: {known})")
    })?;
    Ok((field, value.to_string()))
}
