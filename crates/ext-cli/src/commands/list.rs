//! The list command

use colored::Colorize;
use ext_catalog::{Eligibility, assess, installable_by_package};
use serde::Serialize;

use crate::context::SiteContext;
use crate::error::Result;

#[derive(Serialize)]
struct ListedExtension<'a> {
    name: &'a str,
    display_name: &'a str,
    version: &'a str,
    description: &'a str,
    eligibility: Eligibility,
}

#[derive(Serialize)]
struct ListedPackage<'a> {
    package: &'a str,
    collapsed: bool,
    extensions: Vec<ListedExtension<'a>>,
}

/// Run the list command
pub fn run_list(site: &SiteContext, filter: Option<&str>, json: bool) -> Result<()> {
    let groups = installable_by_package(&site.catalog, filter);

    let packages: Vec<ListedPackage<'_>> = groups
        .iter()
        .map(|group| ListedPackage {
            package: group.package,
            collapsed: group.collapsed,
            extensions: group
                .extensions
                .iter()
                .map(|ext| ListedExtension {
                    name: &ext.name,
                    display_name: &ext.display_name,
                    version: &ext.version,
                    description: &ext.description,
                    eligibility: assess(&site.catalog, ext, &site.config.host),
                })
                .collect(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&packages)?);
        return Ok(());
    }

    if packages.is_empty() {
        println!("{}", "No installable extensions found.".dimmed());
        return Ok(());
    }

    let mut total = 0;
    for package in &packages {
        let suffix = if package.collapsed { " (collapsed)" } else { "" };
        println!("{}{}", package.package.cyan().bold(), suffix.dimmed());
        for ext in &package.extensions {
            total += 1;
            let name = if ext.eligibility.selectable {
                ext.name.green()
            } else {
                ext.name.red()
            };
            println!(
                "  {:<20} {} {}",
                name,
                ext.display_name,
                ext.version.dimmed()
            );
            for reason in ext.eligibility.blocking_reasons() {
                println!("  {:<20} {} {}", "", "-".dimmed(), reason.yellow());
            }
        }
        println!();
    }

    println!(
        "{} {} extensions installable. Use {} to plan an install.",
        "Total:".dimmed(),
        total,
        "extinstall plan <name>...".cyan()
    );
    Ok(())
}
