//! Hosting accounts known to the `gh` CLI.

use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Narrow view of "which accounts can I push to".
pub trait AccountSource: Send + Sync {
    fn list_accounts(&self) -> Vec<String>;
}

static ACCOUNT_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"github\.com\b.*?\baccount\s+\(?([A-Za-z0-9][A-Za-z0-9_-]*)\)?").ok());

/// `gh auth status` for logged-in users, then `gh api user/orgs` for orgs.
#[derive(Debug, Clone, Copy, Default)]
pub struct GhCli;

impl GhCli {
    fn run(args: &[&str]) -> Option<String> {
        let output = Command::new("gh").args(args).output().ok()?;
        if !output.status.success() {
            debug!(?args, "gh exited unsuccessfully");
            return None;
        }
        // gh auth status has written to stderr in some releases
        let mut text = String::from_utf8_lossy(&output.stdout).to_string();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Some(text)
    }
}

impl AccountSource for GhCli {
    fn list_accounts(&self) -> Vec<String> {
        let mut accounts = Self::run(&["auth", "status"]).map(|out| parse_auth_status(&out)).unwrap_or_default();
        if !accounts.is_empty()
            && let Some(orgs) = Self::run(&["api", "user/orgs", "--jq", ".[].login"])
        {
            for org in parse_org_logins(&orgs) {
                if !accounts.contains(&org) {
                    accounts.push(org);
                }
            }
        }
        accounts
    }
}

/// Logins named after `account` on `github.com` lines, in order, deduplicated.
pub fn parse_auth_status(output: &str) -> Vec<String> {
    let Some(re) = ACCOUNT_RE.as_ref() else { return Vec::new() };
    let mut accounts: Vec<String> = Vec::new();
    for caps in output.lines().filter_map(|line| re.captures(line)) {
        let login = caps[1].to_string();
        if !accounts.contains(&login) {
            accounts.push(login);
        }
    }
    accounts
}

pub fn parse_org_logins(output: &str) -> Vec<String> {
    output.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_string).collect()
}
