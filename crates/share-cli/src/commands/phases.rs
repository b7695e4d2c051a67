//! Phases command implementation

use colored::Colorize;

use share_core::{HookEvent, Phase, WrapMode};

use crate::error::Result;

/// Run the phases command
pub fn run_phases() -> Result<()> {
    println!("{}:", "Phases".bold());
    for phase in Phase::ALL {
        let mode = match phase.mode() {
            WrapMode::Wrapper => "wrapper".normal(),
            WrapMode::Override => "override".yellow(),
        };
        println!("  {} {}", format!("{:<32}", phase.to_string()).cyan(), mode);
    }

    println!();
    println!("{}:", "Events".bold());
    for name in HookEvent::all_names() {
        println!("  {}", name.cyan());
    }
    Ok(())
}
