use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;

/// Runtime configuration, sourced from command line flags, environment
/// variables, and an optional `.env` file.
#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: String,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
    pub port: u16,

    /// The file suffix appended to template names before rendering
    #[arg(long, env, default_value = ".html")]
    pub template_suffix: String,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// The socket address string to bind the listener to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.interface, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_without_flags() {
        let config = Config::try_parse_from(["datastar_relay"]).unwrap();
        assert_eq!(config.interface, "127.0.0.1");
        assert_eq!(config.port, 4000);
        assert_eq!(config.template_suffix, ".html");
        assert_eq!(config.log_level_filter, LevelFilter::Info);
    }

    #[test]
    fn test_listen_addr_joins_interface_and_port() {
        let config =
            Config::try_parse_from(["datastar_relay", "-i", "0.0.0.0", "-p", "8080"]).unwrap();
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_log_level_filter_parses_from_flag() {
        let config = Config::try_parse_from(["datastar_relay", "-l", "DEBUG"]).unwrap();
        assert_eq!(config.log_level_filter, LevelFilter::Debug);
    }
}
