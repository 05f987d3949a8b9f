//! Root CLI definition.

use std::path::PathBuf;

use clap::Parser;
use lmgate_core::Config;
use lmgate_core::config::DEFAULT_ENV_FILE;

/// Serve a local GGUF model over a minimal HTTP API.
#[derive(Debug, Parser)]
#[command(name = "lmgate")]
#[command(about = "Serve a local GGUF model over a minimal HTTP API")]
#[command(version)]
pub struct Cli {
    /// Dotenv file read before configuration is resolved
    #[arg(long = "env-file", default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    /// Let values from the env file replace variables already set
    #[arg(long = "override-env")]
    pub override_env: bool,

    /// Bind address, overrides APP_HOST
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port, overrides APP_PORT
    #[arg(long)]
    pub port: Option<u16>,

    /// Defer model loading until the first chat request
    #[arg(long = "no-preload")]
    pub no_preload: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the environment configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.port = port;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["lmgate"]);
        assert_eq!(cli.env_file, PathBuf::from(".env"));
        assert!(!cli.override_env);
        assert!(!cli.no_preload);
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::parse_from([
            "lmgate",
            "--env-file",
            "/etc/lmgate.env",
            "--override-env",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--no-preload",
        ]);
        assert_eq!(cli.env_file, PathBuf::from("/etc/lmgate.env"));
        assert!(cli.override_env);
        assert!(cli.no_preload);

        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
    }

    #[test]
    fn test_overrides_leave_unset_fields_alone() {
        let cli = Cli::parse_from(["lmgate", "--port", "1234"]);
        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 1234);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(Cli::try_parse_from(["lmgate", "--port", "70000"]).is_err());
    }

    #[test]
    fn test_env_file_values_feed_config() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "LMGATE_CLI_TEST_UNUSED=1").unwrap();
        let cli = Cli::parse_from(["lmgate", "--env-file", file.path().to_str().unwrap()]);
        assert!(lmgate_core::load_env(&cli.env_file, cli.override_env).unwrap());
    }
}
