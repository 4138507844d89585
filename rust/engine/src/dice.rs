use serde::{Deserialize, Serialize};

use crate::rng::RandomSource;

/// Unicode die faces indexed by `value - 1`.
pub const DICE_FACES: [char; 6] = ['⚀', '⚁', '⚂', '⚃', '⚄', '⚅'];

/// One round's roll: an ordered triple of faces, each in `1..=6`.
/// Produced once when betting closes and never modified afterwards.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u8; 3]", into = "[u8; 3]")]
pub struct DiceRoll([u8; 3]);

impl DiceRoll {
    /// Builds a roll from three faces, or `None` if any face is outside `1..=6`.
    pub fn new(dice: [u8; 3]) -> Option<Self> {
        dice.iter()
            .all(|d| (1..=6).contains(d))
            .then_some(Self(dice))
    }

    pub fn values(&self) -> [u8; 3] {
        self.0
    }

    pub fn sum(&self) -> u8 {
        self.0.iter().sum()
    }

    pub fn is_triple(&self) -> bool {
        self.0[0] == self.0[1] && self.0[1] == self.0[2]
    }

    pub fn faces(&self) -> [char; 3] {
        self.0.map(|d| DICE_FACES[usize::from(d - 1)])
    }
}

impl TryFrom<[u8; 3]> for DiceRoll {
    type Error = String;

    fn try_from(dice: [u8; 3]) -> Result<Self, Self::Error> {
        DiceRoll::new(dice).ok_or_else(|| format!("die face out of range: {:?}", dice))
    }
}

impl From<DiceRoll> for [u8; 3] {
    fn from(roll: DiceRoll) -> Self {
        roll.0
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c] = self.faces();
        write!(f, "{} {} {}", a, b, c)
    }
}

/// Draws three independent faces from `rng`.
///
/// A source that answers outside `[1, 6]` breaks the [`RandomSource`]
/// contract; such draws are clamped onto the nearest face so the roll stays
/// valid.
pub fn roll_dice<R: RandomSource + ?Sized>(rng: &mut R) -> DiceRoll {
    let mut dice = [1u8; 3];
    for d in &mut dice {
        let v = rng.random_int(1, 6);
        if !(1..=6).contains(&v) {
            tracing::error!(value = v, "random source returned a face outside 1..=6");
        }
        *d = v.clamp(1, 6) as u8;
    }
    DiceRoll(dice)
}

/// All 216 ordered rolls, in lexicographic order.
pub fn all_rolls() -> Vec<DiceRoll> {
    let mut v = Vec::with_capacity(216);
    for a in 1..=6 {
        for b in 1..=6 {
            for c in 1..=6 {
                v.push(DiceRoll([a, b, c]));
            }
        }
    }
    v
}
