//! Scenario tests
//!
//! Each test builds a small world, runs it through a session and checks the
//! prepared result the players would see.

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use share_core::{ConfigForm, Session, ShareSettings};
use share_host::{MemoryWorld, World};
use share_model::{ActorId, ActorIdentity, ProficiencyRank, Save, Skill, WeaponRunes};
use share_test_utils::{ActorBuilder, armor, bracers, weapon};

fn run(world: MemoryWorld) -> Session<MemoryWorld> {
    let mut session = Session::new(world, ShareSettings { enabled: true });
    session.prepare_all().expect("world should settle");
    session
}

fn world_of(master: ActorBuilder, slave: ActorBuilder) -> MemoryWorld {
    let mut world = MemoryWorld::new();
    world.insert_actor(master.build()).unwrap();
    world.insert_actor(slave.build()).unwrap();
    world
}

// ============================================================================
// Downward mirroring
// ============================================================================

#[test]
fn test_slave_takes_master_hp_and_skill() {
    let world = world_of(
        ActorBuilder::character("m")
            .hp(50, 50)
            .skill(Skill::Acrobatics, ProficiencyRank::Master),
        ActorBuilder::character("s")
            .hp(20, 20)
            .skill(Skill::Acrobatics, ProficiencyRank::Trained)
            .share("m", &["health", "skills"]),
    );

    let session = run(world);
    let slave = session.world().actor(&ActorId::new("s")).unwrap();

    assert_eq!(slave.data.hp.value, 50);
    assert_eq!(slave.data.hp.max, 50);
    assert_eq!(slave.skill_rank(Skill::Acrobatics), ProficiencyRank::Master);
}

#[rstest]
#[case::slave_better(
    ProficiencyRank::Legendary,
    ProficiencyRank::Expert,
    ProficiencyRank::Legendary
)]
#[case::master_better(ProficiencyRank::Trained, ProficiencyRank::Expert, ProficiencyRank::Expert)]
#[case::equal(ProficiencyRank::Master, ProficiencyRank::Master, ProficiencyRank::Master)]
fn test_skill_rank_is_the_better_of_both(
    #[case] slave_rank: ProficiencyRank,
    #[case] master_rank: ProficiencyRank,
    #[case] expected: ProficiencyRank,
) {
    let world = world_of(
        ActorBuilder::character("m").skill(Skill::Stealth, master_rank),
        ActorBuilder::character("s")
            .skill(Skill::Stealth, slave_rank)
            .share("m", &["skills"]),
    );

    let session = run(world);
    let slave = session.world().actor(&ActorId::new("s")).unwrap();

    assert_eq!(slave.skill_rank(Skill::Stealth), expected);
}

#[test]
fn test_weapon_runes_follow_the_best_master_weapon() {
    let world = world_of(
        ActorBuilder::character("m")
            .item(weapon("spear", 1, &["shock"]))
            .item(weapon("sword", 1, &["flaming", "frost"])),
        ActorBuilder::character("s")
            .item(weapon("jaws", 0, &[]))
            .item(weapon("claws", 0, &[]))
            .share("m", &["weapon"]),
    );

    let session = run(world);
    let slave = session.world().actor(&ActorId::new("s")).unwrap();

    let expected = WeaponRunes {
        potency: 1,
        striking: 1,
        property: vec!["flaming".into(), "frost".into()],
    };
    for item in &slave.items {
        assert_eq!(item.weapon().unwrap().runes, expected, "{}", item.id);
    }
}

#[test]
fn test_armor_and_bracers_per_selector() {
    let world = world_of(
        ActorBuilder::character("m")
            .item(armor("Breastplate", 3, 1))
            .item(bracers("bands-of-force-major")),
        ActorBuilder::character("s").share("m", &["armor"]),
    );

    let session = run(world);
    let slave = session.world().actor(&ActorId::new("s")).unwrap();

    // armor potency 3 beats the bracers for AC, bracers' 3 beat resilient 1
    assert_eq!(slave.data.ac, 13);
    for save in Save::ALL {
        assert_eq!(slave.data.saves[&save], 3, "{save:?}");
    }
}

// ============================================================================
// Upward propagation
// ============================================================================

#[test]
fn test_slave_damage_lands_on_master() {
    let world = world_of(
        ActorBuilder::character("m").hp(20, 20),
        ActorBuilder::npc("s").hp(20, 20).share("m", &["health"]),
    );
    let mut session = run(world);

    session
        .update_actor(
            &ActorIdentity::persistent("s"),
            json!({"system": {"attributes": {"hp": {"value": 15}}}}),
        )
        .unwrap();

    let master = session.world().actor(&ActorId::new("m")).unwrap();
    assert_eq!(master.source.system.attributes.hp.value, 15);
    assert_eq!(master.data.hp.value, 15);
}

#[test]
fn test_slave_damage_stays_local_without_health() {
    let world = world_of(
        ActorBuilder::character("m").hp(20, 20),
        ActorBuilder::npc("s").hp(20, 20).share("m", &["turn"]),
    );
    let mut session = run(world);

    session
        .update_actor(
            &ActorIdentity::persistent("s"),
            json!({"system.attributes.hp.value": 15}),
        )
        .unwrap();

    let master = session.world().actor(&ActorId::new("m")).unwrap();
    assert_eq!(master.data.hp.value, 20);
    let slave = session.world().actor(&ActorId::new("s")).unwrap();
    assert_eq!(slave.data.hp.value, 15);
}

// ============================================================================
// Settings and form
// ============================================================================

#[test]
fn test_disabled_setting_changes_nothing() {
    let world = world_of(
        ActorBuilder::character("m").hp(50, 50),
        ActorBuilder::npc("s").hp(20, 20).share("m", &["health"]),
    );
    let mut session = Session::new(world, ShareSettings::default());

    session.prepare_all().unwrap();

    assert!(session.engine().store().is_empty());
    let slave = session.world().actor(&ActorId::new("s")).unwrap();
    assert_eq!(slave.data.hp.value, 20);
}

#[test]
fn test_master_form_offers_no_candidates() {
    let mut world = world_of(
        ActorBuilder::character("m"),
        ActorBuilder::npc("s").share("m", &["health"]),
    );
    world
        .insert_actor(ActorBuilder::character("other").build())
        .unwrap();
    let session = run(world);

    let master = session.world().actor(&ActorId::new("m")).unwrap();
    let form = ConfigForm::build(session.engine(), session.world(), master).unwrap();
    assert!(form.masters.is_empty());

    let other = session.world().actor(&ActorId::new("other")).unwrap();
    let form = ConfigForm::build(session.engine(), session.world(), other).unwrap();
    let candidates: Vec<&str> = form.masters.iter().map(|m| m.value.as_str()).collect();
    assert_eq!(candidates, vec!["m"]);
}
