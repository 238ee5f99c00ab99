//! Session simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform code:
//! - Driven only by `tick(dt)`; any dt (including zero) is safe
//! - Seeded RNG only
//! - Single writer per piece of state (session -> ledger, pool -> slots)

pub mod calibration;
pub mod events;
pub mod lane;
pub mod ledger;
pub mod orbs;
pub mod road;
pub mod session;

pub use calibration::{CALIBRATION_STAGES, Calibration, CalibrationStep};
pub use events::{EventChannel, ListenerId, SessionEvent};
pub use lane::LaneController;
pub use ledger::{ScoreCarry, ScoringRules, SessionLedger};
pub use orbs::{Orb, OrbEvent, OrbId, OrbPool, PickupProbe};
pub use road::RoadScroller;
pub use session::{HudFrame, Session, SessionPhase, TickInput};
