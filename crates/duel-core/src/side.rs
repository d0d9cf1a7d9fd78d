//! The two sides of a duel.

use serde::{Deserialize, Serialize};

/// One of the two combatants' sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The side that opens every round.
    Player,
    /// The side that answers the player.
    Enemy,
}

impl Side {
    /// Both sides in turn order.
    pub const BOTH: [Side; 2] = [Side::Player, Side::Enemy];

    /// The other side.
    pub fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Enemy => write!(f, "enemy"),
        }
    }
}

/// A value held once per side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerSide<T> {
    /// The player's value.
    pub player: T,
    /// The enemy's value.
    pub enemy: T,
}

impl<T> PerSide<T> {
    /// Build from the two values.
    pub fn new(player: T, enemy: T) -> Self {
        Self { player, enemy }
    }

    /// Borrow the value for `side`.
    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    /// Mutably borrow the value for `side`.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    /// Mutably borrow `side`'s value and its opponent's value at once.
    pub fn pair_mut(&mut self, side: Side) -> (&mut T, &mut T) {
        match side {
            Side::Player => (&mut self.player, &mut self.enemy),
            Side::Enemy => (&mut self.enemy, &mut self.player),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opponent_flips() {
        assert_eq!(Side::Player.opponent(), Side::Enemy);
        assert_eq!(Side::Enemy.opponent(), Side::Player);
    }

    #[test]
    fn per_side_pair_orders_actor_first() {
        let mut values = PerSide::new(1, 2);
        let (actor, other) = values.pair_mut(Side::Enemy);
        *actor += 10;
        *other += 20;
        assert_eq!(values, PerSide::new(21, 12));
    }
}
