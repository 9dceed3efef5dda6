use crate::config::{ClientConfig, ServerConfig};
use crate::constants::IPV4_REGEX;
use anyhow::{bail, Result};
use clap::{ArgAction, Parser};
use regex::Regex;
use std::path::PathBuf;

/// Command-line arguments of the server
#[derive(Parser, Debug)]
#[command(
    name = "rouillexferd",
    about = "Password protected file transfer server.",
    disable_help_flag = true
)]
pub struct ServerCli {
    /// Bind server with assigned IPv4 address
    #[arg(short = 'h', long, value_parser = parse_ipv4)]
    pub host: Option<String>,

    /// Bind server with assigned port
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

impl ServerCli {
    /// Flags given on the command line win over the configuration file.
    pub fn apply(&self, config: &mut ServerConfig) -> Result<()> {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        check_endpoint(&config.host, config.port)
    }
}

/// Command-line arguments of the interactive client
#[derive(Parser, Debug)]
#[command(
    name = "rouillexfer",
    about = "Interactive client for rouillexferd.",
    disable_help_flag = true
)]
pub struct ClientCli {
    /// Server IPv4 address
    #[arg(short = 'h', long, value_parser = parse_ipv4)]
    pub host: Option<String>,

    /// Server port
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

impl ClientCli {
    pub fn apply(&self, config: &mut ClientConfig) -> Result<()> {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        check_endpoint(&config.host, config.port)
    }
}

/// Dotted-quad IPv4 check.
pub fn validate_ipv4(ip: &str) -> bool {
    Regex::new(IPV4_REGEX)
        .map(|re| re.is_match(ip))
        .unwrap_or(false)
}

fn parse_ipv4(ip: &str) -> Result<String, String> {
    if validate_ipv4(ip) {
        Ok(ip.to_string())
    } else {
        Err(format!("Invalid IPv4 address: {}", ip))
    }
}

fn check_endpoint(host: &str, port: u16) -> Result<()> {
    if !validate_ipv4(host) {
        bail!("Invalid IPv4 address: {}", host);
    }
    if port == 0 {
        bail!("Invalid port value: {}", port);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ipv4() {
        for ip in ["127.0.0.1", "0.0.0.0", "255.255.255.255", "10.0.0.01"] {
            assert!(validate_ipv4(ip), "{}", ip);
        }
        for ip in ["256.0.0.1", "1.2.3", "1.2.3.4.5", "localhost", "::1", ""] {
            assert!(!validate_ipv4(ip), "{}", ip);
        }
    }

    #[test]
    fn test_short_host_flag() {
        let cli = ServerCli::try_parse_from(["rouillexferd", "-h", "0.0.0.0", "-p", "2121"]).unwrap();
        assert_eq!(cli.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(cli.port, Some(2121));

        let mut config = ServerConfig::default();
        cli.apply(&mut config).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 2121);
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(ClientCli::try_parse_from(["rouillexfer", "-h", "300.1.1.1"]).is_err());
        assert!(ClientCli::try_parse_from(["rouillexfer", "-p", "0"]).is_err());
        assert!(ClientCli::try_parse_from(["rouillexfer", "-p", "65536"]).is_err());
    }

    #[test]
    fn test_config_file_host_is_checked() {
        let cli = ClientCli::try_parse_from(["rouillexfer"]).unwrap();
        let mut config = ClientConfig {
            host: "example.org".to_string(),
            ..ClientConfig::default()
        };
        assert!(cli.apply(&mut config).is_err());
    }
}
