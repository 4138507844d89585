//! JSONL round history written by `sim --log`.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use taixiu_engine::dice::DiceRoll;
use taixiu_engine::events::{BetResult, Settlement};
use taixiu_engine::ledger::{BetSlip, Side};

use crate::io_utils::ensure_parent_dir;

/// One settled round, one line of the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Sequential id, `YYYYMMDD-NNNNNN`
    pub round_id: String,
    pub session_id: String,
    #[serde(default)]
    pub seed: Option<u64>,
    pub dice: DiceRoll,
    pub sum: u8,
    /// `null` for a triple
    pub side: Option<Side>,
    pub bets: BetSlip,
    pub winnings: u64,
    pub result: BetResult,
    pub balance: u64,
    /// RFC3339, filled in on write when missing
    #[serde(default)]
    pub ts: Option<String>,
}

impl RoundRecord {
    pub fn from_settlement(
        round_id: String,
        seed: Option<u64>,
        bets: BetSlip,
        s: &Settlement,
    ) -> Self {
        Self {
            round_id,
            session_id: s.session_id.to_string(),
            seed,
            dice: s.dice,
            sum: s.sum,
            side: s.side,
            bets,
            winnings: s.winnings,
            result: s.result,
            balance: s.balance,
            ts: None,
        }
    }
}

pub fn format_round_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

pub struct RoundLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl RoundLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        ensure_parent_dir(path.as_ref())?;
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    /// Logger that only hands out ids, for tests.
    pub fn with_seq_for_test(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_round_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &RoundRecord) -> std::io::Result<()> {
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
