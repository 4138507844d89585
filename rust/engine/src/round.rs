use serde::{Deserialize, Serialize};

use crate::dice::DiceRoll;
use crate::rng::RandomSource;

/// Lifecycle state of the current round.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundState {
    /// No round has been started yet
    Idle,
    /// Countdown running, bets accepted
    Betting,
    /// Betting closed, dice being drawn
    Rolling,
    /// Dice drawn and shown, waiting for settlement
    Results,
}

impl RoundState {
    pub fn as_str(self) -> &'static str {
        match self {
            RoundState::Idle => "idle",
            RoundState::Betting => "betting",
            RoundState::Rolling => "rolling",
            RoundState::Results => "results",
        }
    }
}

impl std::fmt::Display for RoundState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque round token: base-36 millisecond timestamp and a random 4-digit
/// suffix, e.g. `lzq3k9a1-4821`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        Self::at(now_millis(), rng)
    }

    /// Id for a round opened at `millis` since the Unix epoch.
    pub fn at<R: RandomSource + ?Sized>(millis: u64, rng: &mut R) -> Self {
        let suffix = rng.random_int(1000, 9999);
        Self(format!("{}-{}", to_base36(millis), suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last six characters, as shown in compact history lists.
    pub fn short(&self) -> &str {
        let start = self.0.len().saturating_sub(6);
        self.0.get(start..).unwrap_or(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wall-clock milliseconds since the Unix epoch, zero before it.
pub fn now_millis() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".into();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// The round in progress. Replaced wholesale when the next round starts.
#[derive(Debug, Clone)]
pub struct RoundSession {
    pub(crate) id: SessionId,
    pub(crate) state: RoundState,
    pub(crate) time_remaining: u32,
    pub(crate) roll: Option<DiceRoll>,
}

impl RoundSession {
    pub(crate) fn open(id: SessionId, betting_window: u32) -> Self {
        Self {
            id,
            state: RoundState::Betting,
            time_remaining: betting_window,
            roll: None,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn roll(&self) -> Option<DiceRoll> {
        self.roll
    }
}
