use clap::Parser;
use log::kv::{ToValue, Value};

#[derive(Parser, Debug, PartialEq)]
#[command(version, about)]
pub struct CliArgs {
    /// Path to a TOML config file.
    #[arg(short, long)]
    pub config: Option<String>,
    /// Skip loading variables from a `.env` file.
    #[arg(long)]
    pub no_dotenv: bool,
}

impl ToValue for CliArgs {
    fn to_value(&self) -> Value<'_> {
        Value::from_debug(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = CliArgs::parse_from(["self", "--config", "foo"]);
        assert_eq!(
            args,
            CliArgs {
                config: Some("foo".to_string()),
                no_dotenv: false,
            }
        );
    }

    #[test]
    fn test_args_defaults() {
        let args = CliArgs::parse_from(["self", "--no-dotenv"]);
        assert_eq!(args.config, None);
        assert!(args.no_dotenv);
    }
}
