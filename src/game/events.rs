//! Discrete events emitted by the simulation for UI collaborators

use serde::{Deserialize, Serialize};

use crate::game::state::{BattlePhase, Fighter, FighterId};

/// Something the scoreboard or status line may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BattleEvent {
    /// Battle moved to a new phase
    PhaseChanged { phase: BattlePhase },
    /// Fighter crossed the safe-zone boundary and its grace timer started
    LeftSafeZone { fighter: FighterId },
    /// Fighter came back inside before its grace expired
    ReturnedToSafeZone { fighter: FighterId },
    /// Collision damage
    Hit {
        attacker: FighterId,
        victim: FighterId,
        intensity: f32,
        /// Battle clock (ms)
        at_ms: f64,
    },
    /// Fighter is out of the round
    Eliminated {
        fighter: FighterId,
        placement: usize,
        reason: String,
    },
    /// Round is over; `None` when nobody survived
    Finished { winner: Option<FighterId> },
}

impl BattleEvent {
    /// Fighters this event concerns, for scoreboard highlighting
    pub fn fighters(&self) -> Vec<FighterId> {
        match self {
            BattleEvent::PhaseChanged { .. } => Vec::new(),
            BattleEvent::LeftSafeZone { fighter }
            | BattleEvent::ReturnedToSafeZone { fighter }
            | BattleEvent::Eliminated { fighter, .. } => vec![*fighter],
            BattleEvent::Hit { attacker, victim, .. } => vec![*attacker, *victim],
            BattleEvent::Finished { winner } => winner.iter().copied().collect(),
        }
    }

    /// One-line log text, resolving fighter ids against `fighters`
    pub fn describe(&self, fighters: &[Fighter]) -> String {
        let name = |id: FighterId| {
            fighters
                .get(id)
                .map(|f| f.name.as_str())
                .unwrap_or("unknown fighter")
        };
        match self {
            BattleEvent::PhaseChanged { phase } => format!("Battle is now {}", phase),
            BattleEvent::LeftSafeZone { fighter } => format!("{} left the safe zone", name(*fighter)),
            BattleEvent::ReturnedToSafeZone { fighter } => {
                format!("{} made it back inside", name(*fighter))
            }
            BattleEvent::Hit {
                attacker,
                victim,
                intensity,
                at_ms,
            } => format!(
                "[{:>6.1}s] {} hit {} (impact {:.2})",
                at_ms / 1000.0,
                name(*attacker),
                name(*victim),
                intensity
            ),
            BattleEvent::Eliminated {
                fighter,
                placement,
                reason,
            } => format!("{} is out in place #{}: {}", name(*fighter), placement, reason),
            BattleEvent::Finished { winner: Some(id) } => format!("{} wins the battle!", name(*id)),
            BattleEvent::Finished { winner: None } => "No clear winner, try again!".to_string(),
        }
    }
}
