//! The client replica and its read-side lookups.

use skullsync_protocol::{ModelSnapshot, PlayerId, SquareId};

use crate::player::{PLACEHOLDER_PLAYER, PlayerReplica, PowerUpReplica};
use crate::square::{PLACEHOLDER_SQUARE, SquareReplica, WeaponReplica};

/// The client's displayable approximation of server truth.
///
/// The replica owns every nested list. Cross references (positions,
/// damage and mark sources, killers, the current player) are ids that
/// are resolved on every read, so they can never dangle across a
/// [`replace_full`](Self::replace_full).
///
/// Lookups never fail: an unknown id reads as the first element of the
/// list, or as a zero-valued placeholder when the list is empty. That is
/// a compatibility fallback for display code, not a guarantee that the
/// returned element is the one asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientReplica {
    pub squares: Vec<SquareReplica>,
    pub players: Vec<PlayerReplica>,
    pub current_player_id: PlayerId,
    pub kill_track: Vec<PlayerId>,
    pub skulls_left: u32,
    pub weapon_cards_left: u32,
    pub power_up_cards_left: u32,
    pub map_id: u32,
    /// The viewer's own id.
    pub player_id: PlayerId,
    /// The viewer's own score.
    pub points: u32,
    pub power_up_hand: Vec<PowerUpReplica>,
}

impl ClientReplica {
    pub fn from_snapshot(snapshot: ModelSnapshot) -> Self {
        let mut replica = Self::default();
        replica.replace_full(snapshot);
        replica
    }

    /// Discards all state and rebuilds it from `snapshot`.
    pub fn replace_full(&mut self, snapshot: ModelSnapshot) {
        *self = Self {
            squares: snapshot.squares.into_iter().map(SquareReplica::from).collect(),
            players: snapshot.players.into_iter().map(PlayerReplica::from).collect(),
            current_player_id: snapshot.current_player_id,
            kill_track: snapshot.kill_shot_track,
            skulls_left: snapshot.skulls_left,
            weapon_cards_left: snapshot.weapon_cards_left,
            power_up_cards_left: snapshot.power_up_cards_left,
            map_id: snapshot.map_id,
            player_id: snapshot.player_id,
            points: snapshot.points,
            power_up_hand: snapshot
                .power_up_in_hand
                .into_iter()
                .map(PowerUpReplica::from)
                .collect(),
        };
    }

    // -- Lookups ----------------------------------------------------------

    /// The player with `id`, falling back to the first player or the
    /// placeholder.
    pub fn find_player(&self, id: PlayerId) -> &PlayerReplica {
        self.players
            .iter()
            .find(|p| p.id == id)
            .or_else(|| self.players.first())
            .unwrap_or(&PLACEHOLDER_PLAYER)
    }

    /// The square with `id`, falling back to the first square or the
    /// placeholder.
    pub fn find_square(&self, id: SquareId) -> &SquareReplica {
        self.squares
            .iter()
            .find(|s| s.id() == id)
            .or_else(|| self.squares.first())
            .unwrap_or(&PLACEHOLDER_SQUARE)
    }

    pub fn current_player(&self) -> &PlayerReplica {
        self.find_player(self.current_player_id)
    }

    /// The local viewer's own player record.
    pub fn viewer(&self) -> &PlayerReplica {
        self.find_player(self.player_id)
    }

    /// The square `player` stands on, or `None` if they're off the board.
    pub fn position_of(&self, player: &PlayerReplica) -> Option<&SquareReplica> {
        let id = player.position?;
        self.squares.iter().find(|s| s.id() == id)
    }

    /// The weapon called `name` held by the player with `id`.
    pub fn weapon_of(&self, id: PlayerId, name: &str) -> Option<&WeaponReplica> {
        self.player(id)?.weapon(name)
    }

    // -- Derived views ----------------------------------------------------

    /// Who damaged `player`, one entry per token, as player records.
    pub fn damage_players(&self, player: &PlayerReplica) -> Vec<&PlayerReplica> {
        self.resolve(&player.damage)
    }

    /// Who marked `player`, one entry per mark, as player records.
    pub fn mark_players(&self, player: &PlayerReplica) -> Vec<&PlayerReplica> {
        self.resolve(&player.marks)
    }

    /// The kill-shot track's killers, in order, as player records.
    pub fn kill_track_players(&self) -> Vec<&PlayerReplica> {
        self.resolve(&self.kill_track)
    }

    fn resolve(&self, ids: &[PlayerId]) -> Vec<&PlayerReplica> {
        ids.iter().map(|id| self.find_player(*id)).collect()
    }

    // -- Mutations --------------------------------------------------------

    /// Takes `skulls` off the track.
    ///
    /// Returns `false`, changing nothing, unless `skulls` is strictly less
    /// than the skulls left; a duplicated or reordered removal therefore
    /// can't drive the count to or past zero.
    pub fn remove_skulls(&mut self, skulls: u32) -> bool {
        if skulls >= self.skulls_left {
            return false;
        }
        self.skulls_left -= skulls;
        true
    }

    pub(crate) fn player(&self, id: PlayerId) -> Option<&PlayerReplica> {
        self.players.iter().find(|p| p.id == id)
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Option<&mut PlayerReplica> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub(crate) fn square_mut(&mut self, id: SquareId) -> Option<&mut SquareReplica> {
        self.squares.iter_mut().find(|s| s.id() == id)
    }
}
