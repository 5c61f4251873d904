//! The show command

use colored::Colorize;
use ext_catalog::{DependencyState, RequiredBy, assess};

use crate::context::SiteContext;
use crate::error::{CliError, Result};

/// Run the show command
pub fn run_show(site: &SiteContext, name: &str, json: bool) -> Result<()> {
    let extension = site
        .catalog
        .get(name)
        .ok_or_else(|| CliError::user(format!("Unknown extension '{name}'")))?;
    let eligibility = assess(&site.catalog, extension, &site.config.host);

    if json {
        println!("{}", serde_json::to_string_pretty(&eligibility)?);
        return Ok(());
    }

    println!(
        "{} ({}) {}",
        extension.display_name.bold(),
        extension.name,
        extension.version.dimmed()
    );
    if !extension.description.is_empty() {
        println!("  {}", extension.description);
    }
    println!("  {:<12} {}", "Package:".dimmed(), extension.package);

    let status = if extension.enabled {
        "enabled".green()
    } else if eligibility.selectable {
        "installable".green()
    } else {
        "not installable".red()
    };
    println!("  {:<12} {}", "Status:".dimmed(), status);

    if !eligibility.requires.is_empty() {
        let requires: Vec<String> = eligibility
            .requires
            .iter()
            .map(|dep| {
                let state = match &dep.state {
                    DependencyState::Missing => "missing".red(),
                    DependencyState::IncompatibleVersion { .. } => "incompatible version".red(),
                    DependencyState::CoreIncompatible => "incompatible with core".red(),
                    DependencyState::Enabled => "enabled".green(),
                    DependencyState::Disabled => "disabled".yellow(),
                };
                format!("{} ({})", dep.display_name, state)
            })
            .collect();
        println!("  {:<12} {}", "Requires:".dimmed(), requires.join(", "));
    }

    if !eligibility.required_by.is_empty() {
        let required_by: Vec<String> = eligibility
            .required_by
            .iter()
            .map(|by| match by {
                RequiredBy::Profile {
                    distribution,
                    explanation,
                } => match explanation {
                    Some(explanation) => format!("{distribution} profile ({explanation})"),
                    None => format!("{distribution} profile"),
                },
                RequiredBy::Extension {
                    display_name,
                    enabled,
                    ..
                } if *enabled => format!("{display_name} (enabled)"),
                RequiredBy::Extension { display_name, .. } => display_name.clone(),
            })
            .collect();
        println!("  {:<12} {}", "Required by:".dimmed(), required_by.join(", "));
    }

    for reason in eligibility.blocking_reasons() {
        println!("  {} {}", "-".dimmed(), reason.yellow());
    }
    Ok(())
}
