//! Run command implementation

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use share_core::{ConfigSubmission, Session, Settings, TurnReport, identity_of, master_of};
use share_host::{MemoryWorld, World};
use share_model::{ActorId, ActorIdentity, ItemId};

use crate::error::Result;
use crate::scenario::{Scenario, Step, parse_target};

/// What one replayed step did
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum StepOutcome {
    Prepare {
        target: ActorIdentity,
        role: String,
    },
    Update {
        target: ActorIdentity,
    },
    Delete {
        actor: ActorId,
    },
    Turn {
        report: TurnReport,
    },
    ResetEncounter {
        actors: Vec<ActorIdentity>,
    },
    Configure {
        target: ActorIdentity,
    },
    Duration {
        target: ActorIdentity,
        effect: ItemId,
        expired: bool,
        remaining: Option<i64>,
    },
}

/// Prepared state of one actor instance after the run
#[derive(Debug, Clone, Serialize)]
pub struct ActorSummary {
    pub identity: ActorIdentity,
    pub name: String,
    pub kind: String,
    pub hp: i32,
    pub hp_max: i32,
    pub hero_points: i32,
    pub ac: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master: Option<ActorId>,
    pub slaves: Vec<ActorIdentity>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub enabled: bool,
    pub steps: Vec<StepOutcome>,
    pub actors: Vec<ActorSummary>,
}

/// Run the run command
pub fn run_scenario(path: &Path, settings: Option<&Path>, json: bool) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let settings = match settings {
        Some(path) => Settings::load(path)?.share,
        None => scenario.share.clone(),
    };
    let mut session = Session::new(scenario.build_world()?, settings);
    let report = replay(&mut session, &scenario.steps)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(path, &report);
    }
    Ok(())
}

/// Prepare the whole world, then replay every step in order
pub fn replay(session: &mut Session<MemoryWorld>, steps: &[Step]) -> Result<RunReport> {
    session.prepare_all()?;

    let mut outcomes = Vec::with_capacity(steps.len());
    for step in steps {
        outcomes.push(apply_step(session, step)?);
    }

    Ok(RunReport {
        enabled: session.settings().enabled,
        steps: outcomes,
        actors: summarize(session),
    })
}

fn apply_step(session: &mut Session<MemoryWorld>, step: &Step) -> Result<StepOutcome> {
    let outcome = match step {
        Step::Prepare { target } => {
            let target = parse_target(target)?;
            let role = session.prepare(&target)?;
            session.settle()?;
            StepOutcome::Prepare {
                target,
                role: role.to_string(),
            }
        }
        Step::Update { target, changes } => {
            let target = parse_target(target)?;
            session.update_actor(&target, changes.clone())?;
            StepOutcome::Update { target }
        }
        Step::Delete { actor } => {
            session.delete_actor(actor)?;
            StepOutcome::Delete {
                actor: actor.clone(),
            }
        }
        Step::StartTurn { combatant } => StepOutcome::Turn {
            report: session.start_turn(combatant)?,
        },
        Step::EndTurn { combatant } => StepOutcome::Turn {
            report: session.end_turn(combatant)?,
        },
        Step::ResetEncounter => StepOutcome::ResetEncounter {
            actors: session.reset_encounter_actors()?,
        },
        Step::Configure {
            target,
            master,
            categories,
        } => {
            let target = parse_target(target)?;
            let submission = ConfigSubmission {
                master: master.clone(),
                categories: categories.clone(),
            };
            session.submit_config(&target, submission)?;
            StepOutcome::Configure { target }
        }
        Step::Duration { target, effect } => {
            let target = parse_target(target)?;
            let duration = session.remaining_duration(&target, effect)?;
            StepOutcome::Duration {
                target,
                effect: effect.clone(),
                expired: duration.expired,
                remaining: duration.remaining,
            }
        }
    };
    tracing::debug!(?outcome, "Step replayed");
    Ok(outcome)
}

/// Summaries of every actor instance, in world order
pub fn summarize(session: &Session<MemoryWorld>) -> Vec<ActorSummary> {
    let world = session.world();
    world
        .identities()
        .into_iter()
        .filter_map(|identity| {
            let actor = world.resolve(&identity)?;
            let slaves = session
                .engine()
                .slaves_of(world, actor, None)
                .into_iter()
                .map(identity_of)
                .collect();
            Some(ActorSummary {
                name: actor.name().to_string(),
                kind: actor.kind().to_string(),
                hp: actor.data.hp.value,
                hp_max: actor.data.hp.max,
                hero_points: actor.data.hero_points.value,
                ac: actor.data.ac,
                master: master_of(world, actor).map(|master| master.id.clone()),
                slaves,
                identity,
            })
        })
        .collect()
}

fn print_report(path: &Path, report: &RunReport) {
    let state = if report.enabled {
        "enabled".green()
    } else {
        "disabled".yellow()
    };
    println!("{} {} (share {})", "Scenario".bold(), path.display(), state);
    println!();

    if !report.steps.is_empty() {
        println!("{}:", "Steps".bold());
        for (index, step) in report.steps.iter().enumerate() {
            println!("  {} {}", format!("{:>2}.", index + 1).dimmed(), describe(step));
        }
        println!();
    }

    println!("{}:", "Actors".bold());
    for actor in &report.actors {
        let link = match (&actor.master, actor.slaves.len()) {
            (Some(master), _) => format!("slave of {}", master).cyan(),
            (None, 0) => "".normal(),
            (None, n) => format!("master of {}", n).green(),
        };
        println!(
            "  {} ({})  hp {}/{}  hero {}  ac {}  {}",
            actor.name.bold(),
            actor.identity,
            actor.hp,
            actor.hp_max,
            actor.hero_points,
            actor.ac,
            link
        );
    }
}

fn describe(step: &StepOutcome) -> String {
    match step {
        StepOutcome::Prepare { target, role } => format!("prepare {target}: {role}"),
        StepOutcome::Update { target } => format!("update {target}"),
        StepOutcome::Delete { actor } => format!("delete {actor}"),
        StepOutcome::Turn { report } => format!(
            "{} {}: {} processed, {} skipped, {} failed",
            report.event,
            report.combatant,
            report.processed.len(),
            report.skipped.len(),
            report.failed.len()
        ),
        StepOutcome::ResetEncounter { actors } => {
            format!("reset encounter: {} actors", actors.len())
        }
        StepOutcome::Configure { target } => format!("configure {target}"),
        StepOutcome::Duration {
            target,
            effect,
            expired,
            remaining,
        } => {
            let remaining = remaining.map_or("unlimited".to_string(), |r| r.to_string());
            format!("duration {effect} on {target}: {remaining} left, expired {expired}")
        }
    }
}
