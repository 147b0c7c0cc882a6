//! Elimination bookkeeping, placements and final results
//!
//! Placements are handed out from the back of the field: a fighter eliminated
//! while `n` others are still alive finishes `n + 1`. The winner always gets 1.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::game::constants::game::MAX_GAME_DURATION_MS;
use crate::game::events::BattleEvent;
use crate::game::state::{Fighter, FighterId};
use crate::util::rng::RandomSource;

pub const VICTORY_REASON: &str = "Victory!";
pub const KNOCKED_OUT_REASON: &str = "Knocked out";
pub const OUTLASTED_REASON: &str = "Outlasted at the time limit";

/// One line of the results list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub fighter_id: FighterId,
    pub name: String,
    /// 1 = winner
    pub placement: usize,
    /// Elapsed round time at elimination (or battle end for the winner)
    pub elimination_time_ms: f64,
    pub hits_taken: u32,
    pub hits_inflicted: u32,
    pub elimination_reason: String,
}

impl ResultEntry {
    fn snapshot(fighter: &Fighter, placement: usize, elapsed_ms: f64, reason: &str) -> Self {
        Self {
            fighter_id: fighter.id,
            name: fighter.name.clone(),
            placement,
            elimination_time_ms: elapsed_ms,
            hits_taken: fighter.hits_taken,
            hits_inflicted: fighter.hits_inflicted,
            elimination_reason: reason.to_string(),
        }
    }

    pub fn is_winner(&self) -> bool {
        self.placement == 1
    }

    /// Human-readable line, e.g. `#2 Hades - Lost outside the arena · survived 8.4s · dealt 1 · taken 2`
    pub fn describe(&self) -> String {
        format!(
            "#{} {} - {} · survived {:.1}s · dealt {} · taken {}",
            self.placement,
            self.name,
            self.elimination_reason,
            self.elimination_time_ms / 1000.0,
            self.hits_inflicted,
            self.hits_taken
        )
    }
}

/// Reason why the round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchEndReason {
    /// Exactly one fighter left
    LastStanding,
    /// Everyone went down in the same tick
    NoSurvivors,
    /// Round hit the duration cap with several fighters alive
    TimeLimit,
}

/// Check if the round should end
pub fn check_battle_end(alive_count: usize, elapsed_ms: f64) -> Option<MatchEndReason> {
    match alive_count {
        0 => Some(MatchEndReason::NoSurvivors),
        1 => Some(MatchEndReason::LastStanding),
        _ if elapsed_ms >= MAX_GAME_DURATION_MS => Some(MatchEndReason::TimeLimit),
        _ => None,
    }
}

/// Orders the given fighters for a time-limit decision.
///
/// Health first, then hits inflicted, then a random draw. Health is the
/// fighter's fixed pool, so in practice hits inflicted decide. The head of the
/// returned list is the winner.
pub fn tie_break_order(candidates: &[&Fighter], rng: &mut dyn RandomSource) -> Vec<FighterId> {
    let mut keyed: Vec<(FighterId, u32, u32, f32)> = candidates
        .iter()
        .map(|f| (f.id, f.health, f.hits_inflicted, rng.next_unit()))
        .collect();

    keyed.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| b.2.cmp(&a.2))
            .then_with(|| a.3.partial_cmp(&b.3).unwrap_or(Ordering::Equal))
    });

    keyed.into_iter().map(|(id, ..)| id).collect()
}

/// Results accumulated over one round
#[derive(Debug, Clone, Default)]
pub struct Standings {
    results: Vec<ResultEntry>,
    winner: Option<FighterId>,
    finalized: bool,
}

impl Standings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a fighter out of the round. Returns `None` if it was already out.
    pub fn eliminate(
        &mut self,
        fighters: &mut [Fighter],
        id: FighterId,
        reason: &str,
        elapsed_ms: f64,
    ) -> Option<BattleEvent> {
        let fighter = fighters.iter_mut().find(|f| f.id == id)?;
        if !fighter.alive {
            return None;
        }
        fighter.alive = false;
        fighter.eliminated_at = Some(elapsed_ms);
        fighter.elimination_reason = Some(reason.to_string());
        let entry_source = fighter.clone();

        let placement = fighters.iter().filter(|f| f.alive).count() + 1;
        info!(
            "{} eliminated at {:.1}s (placement {}): {}",
            entry_source.name,
            elapsed_ms / 1000.0,
            placement,
            reason
        );
        self.results
            .push(ResultEntry::snapshot(&entry_source, placement, elapsed_ms, reason));

        Some(BattleEvent::Eliminated {
            fighter: id,
            placement,
            reason: reason.to_string(),
        })
    }

    /// Eliminates alive fighters whose hits already reached their health
    pub fn sweep_knockouts(&mut self, fighters: &mut [Fighter], elapsed_ms: f64) -> Vec<BattleEvent> {
        let knocked_out: Vec<FighterId> = fighters
            .iter()
            .filter(|f| f.alive && f.is_knocked_out())
            .map(|f| f.id)
            .collect();

        knocked_out
            .into_iter()
            .filter_map(|id| self.eliminate(fighters, id, KNOCKED_OUT_REASON, elapsed_ms))
            .collect()
    }

    /// Closes the round and returns the winner, if any.
    ///
    /// With several fighters alive the tie-break picks the winner and the rest
    /// are eliminated from the back of the tie-break order, so placements stay
    /// contiguous. Calling this twice is a no-op.
    pub fn finalize(
        &mut self,
        fighters: &mut [Fighter],
        elapsed_ms: f64,
        rng: &mut dyn RandomSource,
    ) -> (Option<FighterId>, Vec<BattleEvent>) {
        let mut events = Vec::new();
        if self.finalized {
            return (self.winner, events);
        }
        self.finalized = true;

        let order = {
            let alive: Vec<&Fighter> = fighters.iter().filter(|f| f.alive).collect();
            tie_break_order(&alive, rng)
        };

        for &loser in order.iter().skip(1).rev() {
            events.extend(self.eliminate(fighters, loser, OUTLASTED_REASON, elapsed_ms));
        }

        self.winner = order.first().copied();
        if let Some(winner) = self.winner.and_then(|id| fighters.iter_mut().find(|f| f.id == id)) {
            winner.eliminated_at = Some(elapsed_ms);
            winner.elimination_reason = Some(VICTORY_REASON.to_string());
            self.results
                .push(ResultEntry::snapshot(winner, 1, elapsed_ms, VICTORY_REASON));
            info!("{} wins after {:.1}s", winner.name, elapsed_ms / 1000.0);
        } else {
            info!("Battle ended with no survivors");
        }

        (self.winner, events)
    }

    pub fn winner(&self) -> Option<FighterId> {
        self.winner
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Results ordered by placement, winner first
    pub fn sorted(&self) -> Vec<ResultEntry> {
        let mut sorted = self.results.clone();
        sorted.sort_by_key(|entry| entry.placement);
        sorted
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Final outcome of a round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleSummary {
    pub winner: Option<String>,
    pub end_reason: MatchEndReason,
    pub duration_ms: f64,
    pub total_hits: u32,
    pub results: Vec<ResultEntry>,
}

impl BattleSummary {
    pub fn headline(&self) -> String {
        match &self.winner {
            Some(name) => format!("Winner: {}", name),
            None => "No winner determined".to_string(),
        }
    }
}
