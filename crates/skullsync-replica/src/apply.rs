//! Applying decoded updates to a [`ClientReplica`].

use skullsync_protocol::{
    AmmoChange, PlayerId, PlayerListChange, PowerUpChange, SquareId, SquareWeaponChange, Update,
    WeaponChange,
};

use crate::ClientReplica;
use crate::player::{PlayerReplica, PowerUpReplica};
use crate::square::WeaponReplica;

/// What [`ClientReplica::apply_incremental`] did with an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The fields implied by the update were changed.
    Patched,
    /// A `model` update replaced the whole replica.
    Replaced,
    /// A `render` update: nothing changed, the view should redraw.
    Redraw,
    /// The update addressed something the replica doesn't have, or a
    /// guard refused it. The replica is unchanged.
    Ignored,
}

impl Applied {
    fn from_hit(hit: bool) -> Self {
        if hit { Self::Patched } else { Self::Ignored }
    }
}

impl ClientReplica {
    /// Mutates exactly the fields `update` implies.
    ///
    /// Updates addressed to unknown players or squares are ignored and
    /// logged; the next full snapshot reconciles them.
    pub fn apply_incremental(&mut self, update: &Update) -> Applied {
        tracing::trace!(kind = update.kind(), "applying update");
        match update {
            Update::Reload(u) => Applied::from_hit(self.reload(&u.weapon, u.loaded)),
            Update::PowerUpDeckRegen(u) => {
                self.power_up_cards_left = u.card_number;
                Applied::Patched
            }
            Update::SkullRemoved(u) => {
                if self.remove_skulls(u.skull_number) {
                    self.kill_track.push(u.killer);
                    Applied::Patched
                } else {
                    tracing::debug!(
                        skulls = u.skull_number,
                        left = self.skulls_left,
                        "skull removal exceeds count, ignored"
                    );
                    Applied::Ignored
                }
            }
            Update::DrawPowerUp(u) => Applied::from_hit(self.draw_power_up(u)),
            Update::DiscardPowerUp(u) => Applied::from_hit(self.discard_power_up(u)),
            Update::PickupWeapon(u) => Applied::from_hit(self.pickup_weapon(u)),
            Update::DiscardWeapon(u) => Applied::from_hit(self.discard_weapon(u)),
            Update::UseAmmo(u) => Applied::from_hit(self.adjust_ammo(u, false)),
            Update::AddAmmo(u) => Applied::from_hit(self.adjust_ammo(u, true)),
            Update::Move(u) => Applied::from_hit(self.move_player(u.player, u.square)),
            Update::Status(u) => Applied::from_hit(self.with_player(u.player, |p| {
                p.status = u.status;
                p.flipped = u.flipped;
            })),
            Update::AddDeath(u) => Applied::from_hit(self.with_player(u.player, |p| {
                p.deaths = p.deaths.saturating_add(1);
                p.next_death_awards = u.points;
            })),
            Update::Damage(u) => Applied::from_hit(self.replace_list(u, |p| &mut p.damage)),
            Update::Mark(u) | Update::RemoveMarks(u) => {
                Applied::from_hit(self.replace_list(u, |p| &mut p.marks))
            }
            Update::AddWeapon(u) => Applied::from_hit(self.add_weapon(u)),
            Update::RemoveWeapon(u) => Applied::from_hit(self.remove_weapon(u)),
            Update::SetInGame(u) => {
                Applied::from_hit(self.with_player(u.player, |p| p.in_game = u.in_game))
            }
            Update::RemoveAmmoTile(u) => Applied::from_hit(self.remove_ammo_tile(u.square)),
            Update::Model { model } => {
                self.replace_full(model.as_ref().clone());
                Applied::Replaced
            }
            Update::Render => Applied::Redraw,
        }
    }

    // -- Per-kind mutations -----------------------------------------------

    fn with_player(&mut self, id: PlayerId, f: impl FnOnce(&mut PlayerReplica)) -> bool {
        match self.player_mut(id) {
            Some(player) => {
                f(player);
                true
            }
            None => {
                tracing::warn!(player = %id, "update for unknown player");
                false
            }
        }
    }

    fn replace_list(
        &mut self,
        change: &PlayerListChange,
        field: impl FnOnce(&mut PlayerReplica) -> &mut Vec<PlayerId>,
    ) -> bool {
        self.with_player(change.player, |p| {
            *field(p) = change.player_list.clone();
        })
    }

    fn reload(&mut self, weapon: &str, loaded: bool) -> bool {
        let held = self.players.iter_mut().find_map(|p| p.weapon_mut(weapon));
        match held {
            Some(w) => {
                w.loaded = loaded;
                true
            }
            None => {
                tracing::warn!(weapon, "reload of a weapon nobody holds");
                false
            }
        }
    }

    fn draw_power_up(&mut self, change: &PowerUpChange) -> bool {
        let hit = self.with_player(change.player, |p| {
            p.card_number = p.card_number.saturating_add(1);
        });
        if !hit {
            return false;
        }
        self.power_up_cards_left = self.power_up_cards_left.saturating_sub(1);
        if change.player == self.player_id {
            self.power_up_hand.push(PowerUpReplica {
                name: change.power_up_name.clone(),
                color: change.power_up_color,
            });
        }
        true
    }

    fn discard_power_up(&mut self, change: &PowerUpChange) -> bool {
        let hit = self.with_player(change.player, |p| {
            p.card_number = p.card_number.saturating_sub(1);
        });
        if hit && change.player == self.player_id {
            let index = self.power_up_hand.iter().position(|c| {
                c.name == change.power_up_name && c.color == change.power_up_color
            });
            if let Some(index) = index {
                self.power_up_hand.remove(index);
            }
        }
        hit
    }

    fn pickup_weapon(&mut self, change: &WeaponChange) -> bool {
        let Some(square_id) = self.player(change.player).and_then(|p| p.position) else {
            tracing::warn!(player = %change.player, "pickup by a player off the board");
            return false;
        };
        let Some(weapon) = self
            .square_mut(square_id)
            .and_then(|s| s.take_weapon(&change.weapon))
        else {
            tracing::debug!(weapon = %change.weapon, square = %square_id, "weapon not on square");
            return false;
        };
        self.with_player(change.player, |p| p.weapons.push(weapon))
    }

    fn discard_weapon(&mut self, change: &WeaponChange) -> bool {
        let Some(player) = self.player_mut(change.player) else {
            tracing::warn!(player = %change.player, "update for unknown player");
            return false;
        };
        let Some(square_id) = player.position else {
            tracing::warn!(player = %change.player, "discard by a player off the board");
            return false;
        };
        let Some(weapon) = player.take_weapon(&change.weapon) else {
            tracing::debug!(weapon = %change.weapon, "weapon not held");
            return false;
        };
        let returned = match self.square_mut(square_id) {
            Some(square) => square.put_weapon(weapon),
            None => Err(weapon),
        };
        if let Err(weapon) = returned {
            // Nowhere to drop it; keep the replica as it was.
            tracing::debug!(square = %square_id, "discard target is not a spawn square");
            self.with_player(change.player, |p| p.weapons.push(weapon));
            return false;
        }
        true
    }

    fn adjust_ammo(&mut self, change: &AmmoChange, add: bool) -> bool {
        let delta = change.ammo();
        self.with_player(change.player, |p| {
            if add {
                p.ammo += delta;
            } else {
                p.ammo -= delta;
            }
        })
    }

    fn move_player(&mut self, player: PlayerId, square: SquareId) -> bool {
        if !self.squares.iter().any(|s| s.id() == square) {
            tracing::warn!(%player, %square, "move to unknown square");
            return false;
        }
        self.with_player(player, |p| p.position = Some(square))
    }

    fn add_weapon(&mut self, change: &SquareWeaponChange) -> bool {
        let weapon = WeaponReplica {
            name: change.weapon.clone(),
            loaded: false,
        };
        match self.square_mut(change.square) {
            Some(square) => square.put_weapon(weapon).is_ok(),
            None => {
                tracing::warn!(square = %change.square, "update for unknown square");
                false
            }
        }
    }

    fn remove_weapon(&mut self, change: &SquareWeaponChange) -> bool {
        match self.square_mut(change.square) {
            Some(square) => square.take_weapon(&change.weapon).is_some(),
            None => {
                tracing::warn!(square = %change.square, "update for unknown square");
                false
            }
        }
    }

    fn remove_ammo_tile(&mut self, id: SquareId) -> bool {
        match self.square_mut(id) {
            Some(square) => square.clear_tile(),
            None => {
                tracing::warn!(square = %id, "update for unknown square");
                false
            }
        }
    }
}
