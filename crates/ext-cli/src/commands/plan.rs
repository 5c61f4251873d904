//! The plan command

use colored::Colorize;
use ext_resolver::{
    DependencyResolver, ResolutionRequest, ResolutionResult, SystemRequirements,
};

use crate::context::SiteContext;
use crate::error::Result;

/// Resolve `names` against the site and stash the result for `confirm`.
pub fn run_plan(site: &SiteContext, names: &[String], json: bool) -> Result<ResolutionResult> {
    let request = ResolutionRequest::validated(&site.catalog, &site.config.host, names.iter().cloned())?;

    let checker = SystemRequirements::new(&site.catalog, &site.config.host);
    let resolver = DependencyResolver::with_options(checker, site.config.resolver.clone());
    let result = resolver.compute_install_set(&site.catalog, &request);

    let account = site.config.account();
    let handoff = site.handoff();
    if result.is_empty() {
        handoff.discard(&account)?;
    } else {
        handoff.stash(&account, &result)?;
        tracing::debug!("Stashed plan for account '{}'", account);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_plan(resolver.checker(), &result);
        if !result.is_empty() {
            println!();
            println!(
                "Run {} within {}s to confirm.",
                "extinstall confirm".cyan(),
                handoff.ttl().as_secs()
            );
        }
    }

    Ok(result)
}

fn print_plan(checker: &SystemRequirements<'_>, result: &ResolutionResult) {
    if result.is_empty() {
        println!("{}", "Nothing to install.".yellow());
    } else {
        println!("{}", "Extensions to install".bold());
        for (name, display_name) in &result.to_install {
            let marker = if result.experimental.contains(name) {
                " [experimental]".yellow()
            } else {
                "".normal()
            };
            println!("  {:<20} {}{}", name.green(), display_name, marker);
        }
    }

    let added: Vec<String> = result
        .dependencies_added
        .iter()
        .flat_map(|(by, deps)| {
            deps.values()
                .map(move |dep| format!("{dep} (required by {})", display(result, by)))
        })
        .collect();
    if !added.is_empty() {
        println!();
        println!("{}", "Added as dependencies".bold());
        for line in added {
            println!("  {line}");
        }
    }

    if !result.experimental.is_empty() {
        println!();
        println!(
            "{} experimental extensions may change without notice.",
            "warning:".yellow().bold()
        );
    }

    for (name, missing) in &result.unresolvable {
        let missing: Vec<&str> = missing.iter().map(String::as_str).collect();
        println!(
            "{} {} depends on unknown {}",
            "warning:".yellow().bold(),
            name,
            missing.join(", ")
        );
    }

    for (name, display_name) in &result.blocked {
        let reasons: Vec<String> = checker
            .failures_for(name)
            .iter()
            .map(ToString::to_string)
            .collect();
        let reasons = if reasons.is_empty() {
            String::new()
        } else {
            format!(": {}", reasons.join("; "))
        };
        println!(
            "{} {} cannot be installed{}",
            "blocked:".red().bold(),
            display_name,
            reasons
        );
        if let Some(dependents) = result.removed_dependents.get(name) {
            let dependents: Vec<&str> = dependents.iter().map(String::as_str).collect();
            println!("  {} {}", "also dropped:".dimmed(), dependents.join(", "));
        }
    }

    if !result.orphaned.is_empty() {
        let orphaned: Vec<&str> = result.orphaned.iter().map(String::as_str).collect();
        println!(
            "  {} {}",
            "no longer needed:".dimmed(),
            orphaned.join(", ")
        );
    }
}

fn display<'a>(result: &'a ResolutionResult, name: &'a str) -> &'a str {
    result
        .to_install
        .get(name)
        .map(String::as_str)
        .unwrap_or(name)
}
