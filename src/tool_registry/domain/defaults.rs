//! Built-in tool-server set used when configuration lists no servers.

use super::{McpServerName, McpTransport, ServerDescriptor, StdioTransportConfig};

const FALLBACK_FILESYSTEM_ROOT: &str = "/tmp";

/// Builds the default server set.
///
/// `lookup` resolves environment variables; servers that need credentials
/// are enabled only when every credential resolves to a non-empty value.
/// `fetch` is always disabled.
#[must_use]
pub fn default_servers(lookup: impl Fn(&str) -> Option<String>) -> Vec<ServerDescriptor> {
    let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
    let filesystem_root = read("HOME").unwrap_or_else(|| FALLBACK_FILESYSTEM_ROOT.to_owned());

    let mut servers = Vec::with_capacity(6);
    servers.extend(npx_server(
        "filesystem",
        "@modelcontextprotocol/server-filesystem",
        &[filesystem_root.as_str()],
        Some(Vec::new()),
    ));
    servers.extend(npx_server(
        "git",
        "@modelcontextprotocol/server-git",
        &[],
        Some(Vec::new()),
    ));
    servers.extend(npx_server(
        "fetch",
        "@modelcontextprotocol/server-fetch",
        &[],
        None,
    ));
    servers.extend(npx_server(
        "github",
        "@modelcontextprotocol/server-github",
        &[],
        credentials(&[("GITHUB_PERSONAL_ACCESS_TOKEN", read("GITHUB_TOKEN"))]),
    ));
    servers.extend(npx_server(
        "brave-search",
        "@modelcontextprotocol/server-brave-search",
        &[],
        credentials(&[("BRAVE_API_KEY", read("BRAVE_API_KEY"))]),
    ));
    servers.extend(npx_server(
        "slack",
        "@modelcontextprotocol/server-slack",
        &[],
        credentials(&[
            ("SLACK_BOT_TOKEN", read("SLACK_BOT_TOKEN")),
            ("SLACK_TEAM_ID", read("SLACK_TEAM_ID")),
        ]),
    ));
    servers
}

/// Returns the credential environment when every value resolved.
fn credentials(entries: &[(&str, Option<String>)]) -> Option<Vec<(String, String)>> {
    entries
        .iter()
        .map(|(key, value)| value.clone().map(|resolved| ((*key).to_owned(), resolved)))
        .collect()
}

/// Builds an `npx -y <package>` server; `env` of `None` disables it.
fn npx_server(
    name: &str,
    package: &str,
    extra_args: &[&str],
    env: Option<Vec<(String, String)>>,
) -> Option<ServerDescriptor> {
    let server_name = McpServerName::new(name).ok()?;
    let args = ["-y", package]
        .into_iter()
        .chain(extra_args.iter().copied())
        .map(str::to_owned);
    let enabled = env.is_some();
    let transport = StdioTransportConfig::new("npx")
        .with_args(args)
        .with_env(env.unwrap_or_default());
    Some(ServerDescriptor::new(server_name, McpTransport::Stdio(transport)).with_enabled(enabled))
}
