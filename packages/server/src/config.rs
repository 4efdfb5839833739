//! Server configuration.
//!
//! Every option can be given on the command line or through the environment
//! (`HOST`, `PORT`, `ALLOWED_ORIGIN`, ...). `ServerConfig::default()` equals
//! the command line defaults.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::{
    domain::ChangePolicy,
    metronome::{DEFAULT_SEND_TIMEOUT, DEFAULT_SYNC_INTERVAL, HubConfig},
};

/// Per-client outbound queue length used when none is configured
pub const DEFAULT_OUTBOUND_QUEUE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Tempo/beat changes stop playback
    StopOnChange,
    /// Tempo changes keep playing and preserve the beat position
    PhasePreserving,
}

impl From<PolicyArg> for ChangePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::StopOnChange => ChangePolicy::StopOnChange,
            PolicyArg::PhasePreserving => ChangePolicy::PhasePreserving,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "metrosync-server")]
#[command(about = "Shared metronome server: keeps every client of a room on one clock", long_about = None)]
pub struct ServerArgs {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// Comma-separated list of allowed origins (empty = allow all)
    #[arg(long, env = "ALLOWED_ORIGIN", default_value = "")]
    pub allowed_origin: String,

    /// Interval of the periodic re-broadcast while a room is playing
    #[arg(long, env = "SYNC_INTERVAL_MS", default_value = "5000")]
    pub sync_interval_ms: u64,

    /// Timeout of a single push to one client
    #[arg(long, env = "SEND_TIMEOUT_MS", default_value = "2000")]
    pub send_timeout_ms: u64,

    /// Length of the per-client outbound queue
    #[arg(long, env = "OUTBOUND_QUEUE", default_value = "32")]
    pub outbound_queue: usize,

    /// How tempo and beat changes affect a playing metronome
    #[arg(long, env = "CHANGE_POLICY", value_enum, default_value = "stop-on-change")]
    pub change_policy: PolicyArg,
}

impl From<ServerArgs> for ServerConfig {
    fn from(args: ServerArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            allowed_origins: parse_allowed_origins(&args.allowed_origin),
            sync_interval: Duration::from_millis(args.sync_interval_ms.max(1)),
            send_timeout: Duration::from_millis(args.send_timeout_ms.max(1)),
            outbound_queue: args.outbound_queue.max(1),
            change_policy: args.change_policy.into(),
        }
    }
}

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Normalized allow-list; empty allows every origin
    pub allowed_origins: Vec<String>,
    pub sync_interval: Duration,
    pub send_timeout: Duration,
    pub outbound_queue: usize,
    pub change_policy: ChangePolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            allowed_origins: Vec::new(),
            sync_interval: DEFAULT_SYNC_INTERVAL,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            outbound_queue: DEFAULT_OUTBOUND_QUEUE,
            change_policy: ChangePolicy::default(),
        }
    }
}

impl ServerConfig {
    pub fn hub_config(&self) -> HubConfig {
        HubConfig {
            sync_interval: self.sync_interval,
            send_timeout: self.send_timeout,
            change_policy: self.change_policy,
        }
    }

    /// Whether `origin` passes the allow-list.
    ///
    /// Comparison is ASCII case-insensitive and ignores a trailing `/`.
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        if self.allowed_origins.is_empty() {
            return true;
        }
        let origin = normalize_origin(origin);
        self.allowed_origins.iter().any(|allowed| *allowed == origin)
    }
}

/// Split a comma-separated origin list, dropping blank entries.
pub fn parse_allowed_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(normalize_origin)
        .filter(|origin| !origin.is_empty())
        .collect()
}

fn normalize_origin(origin: &str) -> String {
    origin.trim().trim_end_matches('/').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_cli_defaults() {
        // テスト項目: 引数なしでパースでき、環境変数が未設定の項目はデフォルト値になる
        // given (前提条件):
        let args = ServerArgs::try_parse_from(["metrosync-server"]).unwrap();

        // when (操作):
        let config = ServerConfig::from(args);

        // then (期待する結果):
        assert_eq!(ServerConfig::default().outbound_queue, DEFAULT_OUTBOUND_QUEUE);
        if std::env::var_os("SYNC_INTERVAL_MS").is_none() {
            assert_eq!(config.sync_interval, Duration::from_millis(5_000));
        }
        if std::env::var_os("CHANGE_POLICY").is_none() {
            assert_eq!(config.change_policy, ChangePolicy::StopOnChange);
        }
    }

    #[test]
    fn test_parse_flags() {
        // テスト項目: コマンドライン引数が設定に反映される
        // given (前提条件):
        let args = ServerArgs::try_parse_from([
            "metrosync-server",
            "--host",
            "0.0.0.0",
            "-p",
            "3000",
            "--allowed-origin",
            "https://a.example, https://B.example/ ,",
            "--sync-interval-ms",
            "3000",
            "--change-policy",
            "phase-preserving",
        ])
        .unwrap();

        // when (操作):
        let config = ServerConfig::from(args);

        // then (期待する結果):
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(config.sync_interval, Duration::from_millis(3_000));
        assert_eq!(config.change_policy, ChangePolicy::PhasePreserving);
    }

    #[test]
    fn test_origin_allow_list() {
        // テスト項目: 許可リストの照合（空なら全許可）
        // given (前提条件):
        let open = ServerConfig::default();
        let restricted = ServerConfig {
            allowed_origins: parse_allowed_origins("https://app.example"),
            ..ServerConfig::default()
        };

        // then (期待する結果):
        assert!(open.is_origin_allowed("https://anything.example"));
        assert!(restricted.is_origin_allowed("https://APP.example/"));
        assert!(!restricted.is_origin_allowed("https://evil.example"));
    }

    #[test]
    fn test_blank_allow_list_allows_all() {
        // テスト項目: 空白やカンマだけの指定は全許可として扱われる
        // then (期待する結果):
        assert!(parse_allowed_origins(" , ,").is_empty());
        assert!(parse_allowed_origins("").is_empty());
    }
}
