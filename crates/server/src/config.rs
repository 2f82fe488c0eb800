use std::{
    fs,
    net::{Ipv4Addr, SocketAddr},
    path::Path,
};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "server.toml";
pub const DEFAULT_PORT: u16 = 53691;
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub port: Option<u16>,
    pub localhost: bool,
    pub verbose: bool,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: format!("127.0.0.1:{DEFAULT_PORT}"),
            port: None,
            localhost: false,
            verbose: false,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    bind_addr: Option<String>,
    port: Option<u16>,
    verbose: Option<bool>,
    max_body_bytes: Option<usize>,
}

/// Flag overrides applied last, after the config file and the environment.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub verbose: bool,
    pub localhost: bool,
}

pub fn load_settings(config_path: Option<&Path>, cli: &CliOverrides) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match config_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?;
            apply_file(&mut settings, &raw)
                .with_context(|| format!("invalid config file '{}'", path.display()))?;
        }
        None => {
            if let Ok(raw) = fs::read_to_string(DEFAULT_CONFIG_FILE) {
                apply_file(&mut settings, &raw)
                    .with_context(|| format!("invalid config file '{DEFAULT_CONFIG_FILE}'"))?;
            }
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    apply_cli(&mut settings, cli);
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileConfig = toml::from_str(raw)?;
    if let Some(v) = file_cfg.bind_addr {
        settings.server_bind = v;
    }
    if let Some(v) = file_cfg.port {
        settings.port = Some(v);
    }
    if let Some(v) = file_cfg.verbose {
        settings.verbose = v;
    }
    if let Some(v) = file_cfg.max_body_bytes {
        settings.max_body_bytes = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = lookup("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = lookup("PORT").and_then(|v| v.parse::<u16>().ok()) {
        settings.port = Some(v);
    }
    if let Some(v) = lookup("APP__PORT").and_then(|v| v.parse::<u16>().ok()) {
        settings.port = Some(v);
    }

    if let Some(v) = lookup("APP__VERBOSE").and_then(|v| v.parse::<bool>().ok()) {
        settings.verbose = v;
    }
}

fn apply_cli(settings: &mut Settings, cli: &CliOverrides) {
    if let Some(port) = cli.port {
        settings.port = Some(port);
    }
    settings.verbose |= cli.verbose;
    settings.localhost |= cli.localhost;
}

impl Settings {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let mut addr: SocketAddr = self
            .server_bind
            .parse()
            .with_context(|| format!("invalid bind address '{}'", self.server_bind))?;
        if let Some(port) = self.port {
            addr.set_port(port);
        }
        if self.localhost {
            addr.set_ip(Ipv4Addr::LOCALHOST.into());
        }
        Ok(addr)
    }

    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
