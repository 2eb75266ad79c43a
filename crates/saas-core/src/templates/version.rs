//! Compatibility between the CLI and the template library it reads

use semver::Version;

fn parse_lenient(version: &str) -> Option<Version> {
    let cleaned = version.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
    Version::parse(cleaned).ok()
}

/// Warn when the template catalog expects a newer CLI.
///
/// Unparseable versions on either side skip the check.
pub fn check_compatibility(
    cli_version: &str,
    catalog_version: Option<&str>,
    upgrade_command: &str,
) -> Option<String> {
    let cli = parse_lenient(cli_version)?;
    let wanted = parse_lenient(catalog_version?)?;

    (cli < wanted).then(|| {
        format!(
            "These templates were written for CLI version {} or newer, you are running {}. Consider updating: {}",
            wanted, cli, upgrade_command
        )
    })
}
