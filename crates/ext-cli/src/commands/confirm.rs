//! The confirm command

use colored::Colorize;
use ext_handoff::ExpirableStore;
use ext_resolver::ResolutionResult;

use crate::context::SiteContext;
use crate::error::{CliError, Result};

/// Take the stashed plan for the configured account and report it.
///
/// Nothing is installed; the command prints what would be enabled.
pub fn run_confirm(site: &SiteContext, json: bool) -> Result<ResolutionResult> {
    let handoff = site.handoff();
    let purged = handoff.store().purge_expired()?;
    if purged > 0 {
        tracing::debug!("Purged {} expired plan(s)", purged);
    }

    let account = site.config.account();
    let result: ResolutionResult = handoff.take(&account)?.ok_or_else(|| {
        CliError::user(format!(
            "No pending install plan for account '{account}'. Run `extinstall plan <name>...` first; plans expire after {}s.",
            handoff.ttl().as_secs()
        ))
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(result);
    }

    println!("{}", "Would enable".bold());
    for (name, display_name) in &result.to_install {
        println!("  {:<20} {}", name.green(), display_name);
    }
    println!();
    println!(
        "{} {} extension(s) confirmed for account {}.",
        "Done:".green().bold(),
        result.to_install.len(),
        account.cyan()
    );
    Ok(result)
}
