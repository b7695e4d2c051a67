//! Masters command implementation

use std::path::Path;

use colored::Colorize;

use share_core::{ConfigForm, Session};

use crate::error::{CliError, Result};
use crate::scenario::{Scenario, parse_target};

/// Run the masters command
pub fn run_masters(path: &Path, actor: &str, json: bool) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let target = parse_target(actor)?;
    let mut session = Session::new(scenario.build_world()?, scenario.share.clone());
    session.prepare_all()?;

    let form = session.config_form(&target).ok_or_else(|| {
        CliError::user(format!(
            "No share configuration for {target}: sharing is disabled \
             or the actor is not a configurable creature"
        ))
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&form)?);
    } else {
        print_form(actor, &form);
    }
    Ok(())
}

fn print_form(actor: &str, form: &ConfigForm) {
    println!("{} {}", "Share configuration of".bold(), actor.cyan());
    println!();

    let current = form
        .master_id
        .as_ref()
        .map_or_else(|| "none".dimmed().to_string(), |id| id.to_string());
    println!("{}: {}", "Master".bold(), current);

    if form.masters.is_empty() {
        println!("  {}", "(no candidates)".dimmed());
    }
    for option in &form.masters {
        let marker = if form.master_id.as_ref() == Some(&option.value) {
            "*".green().bold()
        } else {
            " ".normal()
        };
        println!("  {} {} ({})", marker, option.label, option.value);
    }

    println!();
    println!("{}:", "Categories".bold());
    for group in &form.groups {
        let state = if group.checked {
            "on ".green()
        } else {
            "off".dimmed()
        };
        println!("  [{}] {}", state, group.category);
    }
}
