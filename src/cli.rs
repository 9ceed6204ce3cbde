use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com/api/v4";

#[derive(Parser, Debug)]
#[command(
    name = "dkctl",
    version,
    about = "Bulk-manage GitLab deploy keys across a group and its subgroups"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = DEFAULT_GITLAB_URL,
        help = "GitLab API base URL"
    )]
    pub gitlab_url: String,
    #[arg(
        long,
        short = 't',
        global = true,
        env = "GITLAB_TOKEN",
        hide_env_values = true,
        help = "GitLab private token"
    )]
    pub gitlab_token: Option<String>,
    #[arg(
        long,
        short = 'i',
        global = true,
        env = "GITLAB_GROUP_ID",
        help = "Group whose projects are targeted"
    )]
    pub group_id: Option<u64>,
    #[arg(
        long,
        global = true,
        value_delimiter = ',',
        help = "Explicit project ids, bypassing group traversal"
    )]
    pub project_ids: Vec<u64>,
    #[arg(
        long,
        short = 'r',
        global = true,
        help = "Walk nested subgroups to any depth"
    )]
    pub recursive: bool,
    #[arg(
        long,
        global = true,
        value_parser = parse_header_map,
        help = "JSON object of request headers, replacing the default PRIVATE-TOKEN header"
    )]
    pub headers: Option<BTreeMap<String, String>>,
    #[arg(
        long,
        global = true,
        default_value_t = 30,
        help = "Per-request timeout in seconds"
    )]
    pub timeout_secs: u64,
    #[arg(long, short = 'e', global = true, help = "Print one line per result")]
    pub export: bool,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a deploy key to every targeted project.
    Add {
        #[arg(long, short = 'n', help = "Key title, defaults to Key-YYYY-MM-DD")]
        title: Option<String>,
        #[arg(long, short = 'd', help = "SSH public key material")]
        key: String,
        #[arg(
            long,
            short = 'c',
            default_value_t = true,
            action = clap::ArgAction::Set,
            value_name = "BOOL",
            help = "Grant write access"
        )]
        can_push: bool,
        #[arg(long, help = "Expiry date (ISO 8601)")]
        expires_at: Option<String>,
    },
    /// Remove matching deploy keys from every targeted project.
    Remove {
        #[arg(long, short = 'n', help = "Key title to match, defaults to Key-YYYY-MM-DD")]
        title: Option<String>,
        #[arg(long, short = 'd', help = "SSH public key material to match with --by-key")]
        key: Option<String>,
        #[arg(long, help = "Also match on key material, not just title")]
        by_key: bool,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("missing GitLab token: pass --gitlab-token or set GITLAB_TOKEN")]
    MissingToken,
    #[error("missing target: pass --group-id (or GITLAB_GROUP_ID) or --project-ids")]
    MissingTarget,
}

/// Validated, immutable run configuration handed to discovery and the applier.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub base_url: String,
    pub token: String,
    pub headers: Option<BTreeMap<String, String>>,
    pub group_id: Option<u64>,
    pub project_ids: Vec<u64>,
    pub recursive: bool,
    pub timeout: Duration,
    pub export: bool,
    pub json: bool,
}

impl Cli {
    /// Fail-fast precondition check, performed before any network activity.
    pub fn validate(&self) -> Result<RunConfig, ConfigError> {
        let token = self
            .gitlab_token
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_default();
        if token.is_empty() && self.headers.is_none() {
            return Err(ConfigError::MissingToken);
        }
        if self.group_id.is_none() && self.project_ids.is_empty() {
            return Err(ConfigError::MissingTarget);
        }
        Ok(RunConfig {
            base_url: self.gitlab_url.trim_end_matches('/').to_string(),
            token,
            headers: self.headers.clone(),
            group_id: self.group_id,
            project_ids: self.project_ids.clone(),
            recursive: self.recursive,
            timeout: Duration::from_secs(self.timeout_secs),
            export: self.export,
            json: self.json,
        })
    }
}

fn parse_header_map(raw: &str) -> Result<BTreeMap<String, String>, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid JSON header object: {}", e))
}

pub fn default_key_title() -> String {
    format!("Key-{}", chrono::Local::now().date_naive())
}
