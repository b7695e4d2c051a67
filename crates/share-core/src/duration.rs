//! Effect duration measured against the master's turn

use share_host::{RemainingDuration, World};
use share_model::{Actor, Item};

use crate::access::master_of;

/// Remaining duration of an effect owned by `owner`
///
/// Effects on a slave expire on its master's turn, since the slave has no
/// turn of its own in the encounter.
pub fn remaining_duration<W>(world: &W, owner: &Actor, effect: &Item) -> RemainingDuration
where
    W: World + ?Sized,
{
    world.remaining_duration(owner, effect, master_of(world, owner))
}
