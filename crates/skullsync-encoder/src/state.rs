//! Plain owned game state implementing the [`domain`](crate::domain) views.
//!
//! Good enough to drive a demo table or a test; a real engine implements
//! the traits on its own types instead.

use skullsync_protocol::{AmmoColor, AmmoPack, PlayerColor, PlayerId, PlayerStatus, SquareId};

use crate::domain::{
    AmmoTile, BoardView, NotAvailable, PlayerView, PowerUpView, SquareContents,
    SquareView, WeaponView,
};

/// Points the first death of a fresh board awards.
pub const FIRST_DEATH_POINTS: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeaponCard {
    pub name: String,
    pub loaded: bool,
}

impl WeaponCard {
    pub fn new(name: impl Into<String>, loaded: bool) -> Self {
        Self {
            name: name.into(),
            loaded,
        }
    }
}

impl WeaponView for WeaponCard {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerUpCard {
    pub name: String,
    pub color: AmmoColor,
}

impl PowerUpCard {
    pub fn new(name: impl Into<String>, color: AmmoColor) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

impl PowerUpView for PowerUpCard {
    fn name(&self) -> &str {
        &self.name
    }

    fn color(&self) -> AmmoColor {
        self.color
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareKind {
    Spawn(Vec<WeaponCard>),
    Ammo(Option<AmmoTile>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquareState {
    pub id: SquareId,
    pub kind: SquareKind,
}

impl SquareState {
    pub fn spawn(id: SquareId, weapons: Vec<WeaponCard>) -> Self {
        Self {
            id,
            kind: SquareKind::Spawn(weapons),
        }
    }

    pub fn ammo(id: SquareId, tile: Option<AmmoTile>) -> Self {
        Self {
            id,
            kind: SquareKind::Ammo(tile),
        }
    }
}

impl SquareView for SquareState {
    type Weapon = WeaponCard;

    fn id(&self) -> SquareId {
        self.id
    }

    fn contents(&self) -> SquareContents<'_, WeaponCard> {
        match &self.kind {
            SquareKind::Spawn(weapons) => SquareContents::Spawn(weapons),
            SquareKind::Ammo(tile) => SquareContents::Ammo(*tile),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    pub id: PlayerId,
    pub color: PlayerColor,
    pub username: String,
    pub power_ups: Vec<PowerUpCard>,
    pub damages: Vec<PlayerId>,
    pub marks: Vec<PlayerId>,
    pub weapons: Vec<WeaponCard>,
    pub position: Option<SquareId>,
    pub ammo: AmmoPack,
    pub flipped: bool,
    pub points: u32,
    pub deaths: u32,
    pub points_to_give: u32,
    pub status: PlayerStatus,
}

impl PlayerState {
    /// A player who has not spawned yet.
    pub fn new(id: PlayerId, color: PlayerColor, username: impl Into<String>) -> Self {
        Self {
            id,
            color,
            username: username.into(),
            power_ups: Vec::new(),
            damages: Vec::new(),
            marks: Vec::new(),
            weapons: Vec::new(),
            position: None,
            ammo: AmmoPack::default(),
            flipped: false,
            points: 0,
            deaths: 0,
            points_to_give: FIRST_DEATH_POINTS,
            status: PlayerStatus::Basic,
        }
    }

    pub fn at(mut self, square: SquareId) -> Self {
        self.position = Some(square);
        self
    }
}

impl PlayerView for PlayerState {
    type Weapon = WeaponCard;
    type PowerUp = PowerUpCard;

    fn id(&self) -> PlayerId {
        self.id
    }

    fn color(&self) -> PlayerColor {
        self.color
    }

    fn username(&self) -> &str {
        &self.username
    }

    fn power_ups(&self) -> &[PowerUpCard] {
        &self.power_ups
    }

    fn damages(&self) -> &[PlayerId] {
        &self.damages
    }

    fn marks(&self) -> &[PlayerId] {
        &self.marks
    }

    fn weapons(&self) -> &[WeaponCard] {
        &self.weapons
    }

    fn position(&self) -> Option<SquareId> {
        self.position
    }

    fn ammo(&self) -> AmmoPack {
        self.ammo
    }

    fn is_flipped(&self) -> bool {
        self.flipped
    }

    fn points(&self) -> u32 {
        self.points
    }

    fn deaths(&self) -> u32 {
        self.deaths
    }

    fn points_to_give(&self) -> u32 {
        self.points_to_give
    }

    fn status(&self) -> PlayerStatus {
        self.status
    }
}

/// The kill-shot track.
///
/// Once every skull is gone the track stops answering, the same way a
/// finished track does in the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillTrack {
    pub skulls_left: u32,
    pub killers: Vec<PlayerId>,
}

impl KillTrack {
    pub fn new(skulls: u32) -> Self {
        Self {
            skulls_left: skulls,
            killers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub map_id: u32,
    pub squares: Vec<SquareState>,
    pub players: Vec<PlayerState>,
    pub current_player: PlayerId,
    pub kill_track: KillTrack,
    pub weapon_cards_left: usize,
    pub power_up_cards_left: usize,
}

impl BoardState {
    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut PlayerState> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn square(&self, id: SquareId) -> Option<&SquareState> {
        self.squares.iter().find(|s| s.id == id)
    }
}

impl BoardView for BoardState {
    type Square = SquareState;
    type Player = PlayerState;

    fn map_id(&self) -> u32 {
        self.map_id
    }

    fn squares(&self) -> &[SquareState] {
        &self.squares
    }

    fn players(&self) -> &[PlayerState] {
        &self.players
    }

    fn current_player(&self) -> PlayerId {
        self.current_player
    }

    fn killers(&self) -> Result<Vec<PlayerId>, NotAvailable> {
        if self.kill_track.skulls_left == 0 {
            return Err(NotAvailable("kill-shot track"));
        }
        Ok(self.kill_track.killers.clone())
    }

    fn skulls_left(&self) -> Result<u32, NotAvailable> {
        match self.kill_track.skulls_left {
            0 => Err(NotAvailable("skull count")),
            n => Ok(n),
        }
    }

    fn weapon_cards_left(&self) -> usize {
        self.weapon_cards_left
    }

    fn power_up_cards_left(&self) -> usize {
        self.power_up_cards_left
    }
}
