//! Campaign tests
//!
//! Longer sessions over the shared party: a combat round, reconfiguration
//! through the sheet form and a master leaving the table.

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

use share_core::{ConfigSubmission, Session, Settings, ShareCategory, master_of};
use share_host::{MemoryWorld, World};
use share_model::{ActorId, ActorIdentity, CombatantId, SceneId};
use share_test_utils::world::{CHARACTER_SLAVE, MASTER, NPC_SLAVE, SCENE};
use share_test_utils::{PartyWorld, party};

fn settings_file(dir: &TempDir, enabled: bool) -> Settings {
    let path = dir.path().join("share.toml");
    std::fs::write(&path, format!("[share]\nenabled = {enabled}\n")).unwrap();
    Settings::load(&path).unwrap()
}

fn start(party: PartyWorld) -> Session<MemoryWorld> {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new(party.world, settings_file(&dir, true).share);
    session.prepare_all().unwrap();
    session
}

fn hp(session: &Session<MemoryWorld>, id: &str) -> i32 {
    session
        .world()
        .actor(&ActorId::new(id))
        .unwrap_or_else(|| panic!("{id} missing"))
        .data
        .hp
        .value
}

#[test]
fn test_combat_round() {
    let mut party = party();
    let master_token = ActorIdentity::from(party.master_token.clone());
    party
        .world
        .start_encounter(&SceneId::new(SCENE))
        .unwrap();
    party
        .world
        .add_combatant("c-kyra", master_token, Some(18))
        .unwrap();
    let mut session = start(party);
    let kyra_turn = CombatantId::new("c-kyra");

    let report = session.start_turn(&kyra_turn).unwrap();
    assert_eq!(
        report.processed,
        vec![
            ActorIdentity::persistent(CHARACTER_SLAVE),
            ActorIdentity::persistent(NPC_SLAVE),
        ]
    );

    // The wolf gets bitten; everyone sharing health follows the master
    session
        .update_actor(
            &ActorIdentity::persistent(NPC_SLAVE),
            json!({"system": {"attributes": {"hp": {"value": 41}}}}),
        )
        .unwrap();
    for id in [MASTER, CHARACTER_SLAVE, NPC_SLAVE] {
        assert_eq!(hp(&session, id), 41, "{id}");
    }

    let report = session.end_turn(&kyra_turn).unwrap();
    assert_eq!(report.processed.len(), 2);
    assert!(report.failed.is_empty());

    let reset = session.reset_encounter_actors().unwrap();
    assert_eq!(
        reset,
        vec![
            ActorIdentity::persistent(MASTER),
            ActorIdentity::persistent(CHARACTER_SLAVE),
            ActorIdentity::persistent(NPC_SLAVE),
        ]
    );
}

#[test]
fn test_wolf_moves_to_a_new_master() {
    let mut party = party();
    party
        .world
        .insert_actor(
            share_test_utils::ActorBuilder::character("seoni")
                .hp(28, 30)
                .build(),
        )
        .unwrap();
    let mut session = start(party);
    let wolf = ActorIdentity::persistent(NPC_SLAVE);

    let form = session.config_form(&wolf).unwrap();
    let candidates: Vec<&str> = form.masters.iter().map(|m| m.value.as_str()).collect();
    assert_eq!(candidates, vec![MASTER, "seoni"]);

    session
        .submit_config(
            &wolf,
            ConfigSubmission {
                master: Some(ActorId::new("seoni")),
                categories: BTreeMap::from([
                    (ShareCategory::Health, true),
                    (ShareCategory::Turn, false),
                ]),
            },
        )
        .unwrap();

    assert_eq!(hp(&session, NPC_SLAVE), 28);
    let store = session.engine().store();
    assert!(!store.contains(&ActorId::new(MASTER), &wolf));
    assert!(store.contains(&ActorId::new("seoni"), &wolf));

    // Kyra's damage no longer reaches the wolf
    session
        .update_actor(
            &ActorIdentity::persistent(MASTER),
            json!({"system.attributes.hp.value": 10}),
        )
        .unwrap();
    assert_eq!(hp(&session, CHARACTER_SLAVE), 10);
    assert_eq!(hp(&session, NPC_SLAVE), 28);
}

#[test]
fn test_master_leaves_the_table() {
    let mut party = party();
    let token = party
        .world
        .place_token(
            &SceneId::new(SCENE),
            "t-wolf",
            &ActorId::new(NPC_SLAVE),
            Some(false),
        )
        .unwrap();
    let mut session = start(party);
    assert_eq!(hp(&session, CHARACTER_SLAVE), 50);

    session.delete_actor(&ActorId::new(MASTER)).unwrap();

    assert!(session.world().actor(&ActorId::new(MASTER)).is_none());
    assert!(session.engine().store().slaves(&ActorId::new(MASTER)).is_empty());
    assert_eq!(hp(&session, CHARACTER_SLAVE), 20);
    assert_eq!(hp(&session, NPC_SLAVE), 24);

    let world = session.world();
    for id in [CHARACTER_SLAVE, NPC_SLAVE] {
        let actor = world.actor(&ActorId::new(id)).unwrap();
        assert!(actor.flag("config.master").is_none(), "{id}");
        assert!(master_of(world, actor).is_none(), "{id}");
    }
    let instance = world.resolve(&ActorIdentity::from(token)).unwrap();
    assert!(instance.flag("config.master").is_none());
    assert!(instance.flag("config.health").is_some());
}

#[test]
fn test_disabled_table() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new(party().world, settings_file(&dir, false).share);
    session.prepare_all().unwrap();

    session
        .update_actor(
            &ActorIdentity::persistent(CHARACTER_SLAVE),
            json!({"system.attributes.hp.value": 5}),
        )
        .unwrap();

    assert_eq!(hp(&session, MASTER), 50);
    assert_eq!(hp(&session, CHARACTER_SLAVE), 5);
    assert!(session.config_form(&ActorIdentity::persistent(NPC_SLAVE)).is_none());
}
