//! # taixiu-engine: Tài/Xỉu Round Engine
//!
//! A single-table Over/Under dice engine. Players wager virtual currency on
//! the sum of three dice before a countdown expires; the engine draws the
//! dice, classifies the roll, settles payouts and keeps a bounded history.
//! Rendering, sound and input wiring live outside this crate and talk to it
//! through [`engine::Engine`] and the [`events::RoundObserver`] callbacks.
//!
//! ## Core Modules
//!
//! - [`rng`] - Random sources (OS entropy with ChaCha20 fallback, seeded ChaCha20)
//! - [`dice`] - Dice roll representation and drawing
//! - [`ledger`] - Balance, bet slip and bet validation
//! - [`outcome`] - Roll classification and payout calculation
//! - [`history`] - Bounded newest-first record of settled rounds
//! - [`round`] - Round states and session identifiers
//! - [`engine`] - The round state machine
//! - [`events`] - Notifications for presentation collaborators
//! - [`config`] - Table constants and [`config::GameConfig`]
//! - [`errors`] - Error types for engine operations
//!
//! ## Quick Start
//!
//! ```rust
//! use taixiu_engine::config::GameConfig;
//! use taixiu_engine::engine::{Engine, TickOutcome};
//! use taixiu_engine::events::EventLog;
//! use taixiu_engine::ledger::Side;
//! use taixiu_engine::rng::SeededRandom;
//!
//! let mut engine = Engine::with_rng(GameConfig::default(), SeededRandom::new(42)).unwrap();
//! let log = EventLog::new();
//! engine.subscribe(log.clone());
//!
//! engine.start_round();
//! engine.bet_on(Side::Xiu).unwrap(); // default chip
//! engine.set_manual_open_mode(true);
//!
//! let outcome = engine.resolve_round().unwrap();
//! assert!(matches!(outcome, TickOutcome::Revealed { .. }));
//! let settlement = engine.reveal_open().unwrap();
//! println!("sum {} -> {:?}, won {}", settlement.sum, settlement.side, settlement.winnings);
//! ```
//!
//! ## Classification
//!
//! ```rust
//! use taixiu_engine::dice::DiceRoll;
//! use taixiu_engine::ledger::Side;
//! use taixiu_engine::outcome::classify;
//!
//! assert_eq!(classify(DiceRoll::new([1, 2, 3]).unwrap()).side, Some(Side::Xiu));
//! assert_eq!(classify(DiceRoll::new([6, 6, 5]).unwrap()).side, Some(Side::Tai));
//! assert_eq!(classify(DiceRoll::new([4, 4, 4]).unwrap()).side, None); // triple: house
//! ```

pub mod config;
pub mod dice;
pub mod engine;
pub mod errors;
pub mod events;
pub mod history;
pub mod ledger;
pub mod outcome;
pub mod rng;
pub mod round;
