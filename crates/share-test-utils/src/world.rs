//! Ready-made worlds.
//!
//! [`party`] builds the world most scenarios start from: a master character,
//! a character slave, an NPC slave and the master's arena scene.

use share_host::{MemoryWorld, Scene};
use share_model::{ActorId, ActorIdentity, ProficiencyRank, SceneId, Skill, TokenRef};

use crate::actor::ActorBuilder;

pub const MASTER: &str = "kyra";
pub const CHARACTER_SLAVE: &str = "amiri";
pub const NPC_SLAVE: &str = "wolf";
pub const SCENE: &str = "arena";

/// A [`MemoryWorld`] party with handles to its documents.
pub struct PartyWorld {
    pub world: MemoryWorld,
    pub master_token: TokenRef,
}

impl PartyWorld {
    pub fn master(&self) -> ActorIdentity {
        ActorIdentity::persistent(MASTER)
    }

    pub fn character_slave(&self) -> ActorIdentity {
        ActorIdentity::persistent(CHARACTER_SLAVE)
    }

    pub fn npc_slave(&self) -> ActorIdentity {
        ActorIdentity::persistent(NPC_SLAVE)
    }
}

/// Master `kyra` (50/50 hp, master in Acrobatics), character slave
/// `amiri` sharing every category, NPC slave `wolf` sharing health and
/// turn. The master has a linked token on scene `arena`.
pub fn party() -> PartyWorld {
    let mut world = MemoryWorld::new();
    world.add_scene(Scene::new(SCENE, "Arena"));

    let master = ActorBuilder::character(MASTER)
        .level(5)
        .hp(50, 50)
        .hero_points(2)
        .skill(Skill::Acrobatics, ProficiencyRank::Master)
        .build();
    let amiri = ActorBuilder::character(CHARACTER_SLAVE)
        .level(5)
        .hp(20, 20)
        .skill(Skill::Acrobatics, ProficiencyRank::Trained)
        .share(
            MASTER,
            &["health", "turn", "skills", "hero", "weapon", "armor"],
        )
        .build();
    let wolf = ActorBuilder::npc(NPC_SLAVE)
        .level(2)
        .hp(24, 24)
        .share(MASTER, &["health", "turn"])
        .build();

    for actor in [master, amiri, wolf] {
        world
            .insert_actor(actor)
            .expect("party: duplicate actor id");
    }
    let master_token = world
        .place_token(&SceneId::new(SCENE), "t-kyra", &ActorId::new(MASTER), None)
        .expect("party: failed to place master token");

    PartyWorld {
        world,
        master_token,
    }
}
