//! Lifecycle events, configuration and settings through a session

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use serde_json::json;
use share_core::{
    ConfigSubmission, Error, MAX_SETTLE_VISITS, Session, Settings, ShareCategory, ShareSettings,
    config_of,
};
use share_host::{MemoryWorld, World};
use share_model::{ActorId, ActorIdentity};
use share_test_utils::world::{CHARACTER_SLAVE, MASTER, NPC_SLAVE};
use share_test_utils::{ActorBuilder, FaultyWorld, party};
use tempfile::TempDir;

fn prepared_party() -> Session<MemoryWorld> {
    let mut session = Session::new(party().world, ShareSettings { enabled: true });
    session.prepare_all().unwrap();
    session
}

fn faulty_session(world: FaultyWorld) -> Session<FaultyWorld> {
    let mut session = Session::new(world, ShareSettings { enabled: true });
    session.prepare_all().unwrap();
    session
}

fn identity(id: &str) -> ActorIdentity {
    ActorIdentity::persistent(id)
}

mod upward {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_slave_hp_change_reaches_master() {
        let mut session = prepared_party();

        session
            .update_actor(
                &identity(CHARACTER_SLAVE),
                json!({"system": {"attributes": {"hp": {"value": 15}}}}),
            )
            .unwrap();

        let master = session.world().actor(&ActorId::new(MASTER)).unwrap();
        assert_eq!(master.source.system.attributes.hp.value, 15);
        let wolf = session.world().actor(&ActorId::new(NPC_SLAVE)).unwrap();
        assert_eq!(wolf.data.hp.value, 15);
    }

    #[test]
    fn test_hero_points_reach_master() {
        let mut session = prepared_party();

        session
            .update_actor(
                &identity(CHARACTER_SLAVE),
                json!({"system.resources.heroPoints.value": 0}),
            )
            .unwrap();

        let master = session.world().actor(&ActorId::new(MASTER)).unwrap();
        assert_eq!(master.source.system.resources.hero_points.value, 0);
    }

    #[test]
    fn test_hp_stays_local_without_health() {
        let mut world = party().world;
        world
            .insert_actor(ActorBuilder::npc("bear").hp(30, 30).share(MASTER, &["turn"]).build())
            .unwrap();
        let mut session = Session::new(world, ShareSettings { enabled: true });
        session.prepare_all().unwrap();

        session
            .update_actor(&identity("bear"), json!({"system.attributes.hp.value": 3}))
            .unwrap();

        let master = session.world().actor(&ActorId::new(MASTER)).unwrap();
        assert_eq!(master.source.system.attributes.hp.value, 50);
        let bear = session.world().actor(&ActorId::new("bear")).unwrap();
        assert_eq!(bear.data.hp.value, 3);
    }
}

mod deletion {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deleting_master_unlinks_every_slave() {
        let mut session = prepared_party();

        session.delete_actor(&ActorId::new(MASTER)).unwrap();

        assert!(session.engine().store().is_empty());
        for id in [CHARACTER_SLAVE, NPC_SLAVE] {
            let slave = session.world().actor(&ActorId::new(id)).unwrap();
            assert_eq!(slave.flag("config.master"), None, "{id}");
            assert_eq!(slave.flag("config.turn"), Some(&json!(true)), "{id}");
        }
    }

    #[test]
    fn test_deleting_slave_unregisters_it() {
        let mut session = prepared_party();

        session.delete_actor(&ActorId::new(NPC_SLAVE)).unwrap();

        assert_eq!(
            session.engine().store().slaves(&ActorId::new(MASTER)),
            &[identity(CHARACTER_SLAVE)]
        );
    }

    #[test]
    fn test_deletion_ignored_when_disabled() {
        let mut session = Session::new(party().world, ShareSettings::default());
        session.prepare_all().unwrap();

        session.delete_actor(&ActorId::new(MASTER)).unwrap();

        let wolf = session.world().actor(&ActorId::new(NPC_SLAVE)).unwrap();
        assert_eq!(wolf.flag("config.master"), Some(&json!(MASTER)));
    }
}

mod isolation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_failed_upward_push_does_not_block_the_queue() {
        let mut session = faulty_session(FaultyWorld::new(party().world).fail_writes(MASTER));

        let world = session.world_mut();
        world
            .update_actor(&identity(NPC_SLAVE), json!({"system.attributes.hp.value": 5}))
            .unwrap();
        world
            .unset_flag(&identity(CHARACTER_SLAVE), "config.master")
            .unwrap();

        session.settle().unwrap();

        assert_eq!(session.world().inner().pending_events(), 0);
        let master = session.world().actor(&ActorId::new(MASTER)).unwrap();
        assert_eq!(master.source.system.attributes.hp.value, 50);
        let store = session.engine().store();
        assert!(store.contains(&ActorId::new(MASTER), &identity(NPC_SLAVE)));
        assert!(!store.contains(&ActorId::new(MASTER), &identity(CHARACTER_SLAVE)));
    }

    #[test]
    fn test_failed_unlink_on_delete_is_swallowed() {
        let mut session = faulty_session(FaultyWorld::new(party().world).fail_writes(NPC_SLAVE));

        session.delete_actor(&ActorId::new(MASTER)).unwrap();

        assert_eq!(session.world().inner().pending_events(), 0);
        assert!(session.engine().store().is_empty());
        let amiri = session.world().actor(&ActorId::new(CHARACTER_SLAVE)).unwrap();
        assert_eq!(amiri.flag("config.master"), None);
        let wolf = session.world().actor(&ActorId::new(NPC_SLAVE)).unwrap();
        assert_eq!(wolf.flag("config.master"), Some(&json!(MASTER)));
    }
}

mod settling {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_large_table_settles() {
        let mut world = MemoryWorld::new();
        world
            .insert_actor(ActorBuilder::character("m").hp(50, 50).build())
            .unwrap();
        for n in 0..1100 {
            world
                .insert_actor(
                    ActorBuilder::npc(&format!("s{n}"))
                        .hp(50, 50)
                        .share("m", &["health"])
                        .build(),
                )
                .unwrap();
        }
        let mut session = Session::new(world, ShareSettings { enabled: true });
        session.prepare_all().unwrap();

        session
            .update_actor(&identity("m"), json!({"system.attributes.hp.value": 5}))
            .unwrap();

        assert_eq!(session.world().pending_events(), 0);
        for id in ["s0", "s549", "s1099"] {
            let slave = session.world().actor(&ActorId::new(id)).unwrap();
            assert_eq!(slave.data.hp.value, 5, "{id}");
        }
    }

    #[test]
    fn test_endless_resets_are_reported() {
        let world = FaultyWorld::new(party().world).restless(NPC_SLAVE);
        let mut session = Session::new(world, ShareSettings { enabled: true });

        session.world_mut().request_reset(&identity(NPC_SLAVE));
        let err = session.settle().unwrap_err();

        match err {
            Error::Unsettled { actor, visits } => {
                assert_eq!(actor, identity(NPC_SLAVE));
                assert_eq!(visits, MAX_SETTLE_VISITS + 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

mod configuration {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_master_form_offers_no_candidates() {
        let session = prepared_party();

        let form = session.config_form(&identity(MASTER)).unwrap();
        assert!(form.masters.is_empty());

        let form = session.config_form(&identity(NPC_SLAVE)).unwrap();
        let values: Vec<&str> = form.masters.iter().map(|m| m.value.as_str()).collect();
        // amiri is a valid master candidate only once it stops being a slave
        assert_eq!(values, vec![MASTER]);
    }

    #[test]
    fn test_submission_relinks_slave() {
        let mut session = prepared_party();
        session
            .world_mut()
            .insert_actor(ActorBuilder::character("seoni").hp(33, 33).build())
            .unwrap();
        session.prepare(&identity("seoni")).unwrap();

        session
            .submit_config(
                &identity(NPC_SLAVE),
                ConfigSubmission {
                    master: Some(ActorId::new("seoni")),
                    categories: BTreeMap::from([(ShareCategory::Health, true)]),
                },
            )
            .unwrap();

        let store = session.engine().store();
        assert!(!store.contains(&ActorId::new(MASTER), &identity(NPC_SLAVE)));
        assert!(store.contains(&ActorId::new("seoni"), &identity(NPC_SLAVE)));
        let wolf = session.world().actor(&ActorId::new(NPC_SLAVE)).unwrap();
        assert_eq!(wolf.data.hp.value, 33);
        let config = config_of(wolf).unwrap();
        assert!(config.turn);
    }

    #[test]
    fn test_unlinking_stops_mirroring() {
        let mut session = prepared_party();

        session
            .submit_config(&identity(NPC_SLAVE), ConfigSubmission::default())
            .unwrap();

        assert!(!session
            .engine()
            .store()
            .contains(&ActorId::new(MASTER), &identity(NPC_SLAVE)));
        let wolf = session.world().actor(&ActorId::new(NPC_SLAVE)).unwrap();
        assert_eq!(wolf.data.hp.value, 24);
    }
}

mod settings {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_session_from_settings_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("share.toml");
        std::fs::write(&path, "[share]\nenabled = true\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        let mut session = Session::new(party().world, settings.share);
        session.prepare_all().unwrap();

        assert!(!session.engine().store().is_empty());
    }

    #[test]
    fn test_disabled_world_stays_unlinked() {
        let mut session = Session::new(party().world, ShareSettings::default());
        session.prepare_all().unwrap();

        assert!(session.engine().store().is_empty());
        let amiri = session.world().actor(&ActorId::new(CHARACTER_SLAVE)).unwrap();
        assert_eq!(amiri.data.hp.value, 20);
    }
}
