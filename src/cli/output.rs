//! Output formatting utilities for CLI.

use serde::Serialize;
use skirmish::game::{Effect, Side, StepEvent};
use skirmish::{Outcome, SessionError, SessionResult, World};

/// One-line description of a step event, or `None` for events not worth
/// showing.
pub(super) fn describe_event(event: &StepEvent, world: &World) -> Option<String> {
    match event {
        StepEvent::Acted {
            actor,
            action,
            effect,
        } => {
            let who = world.entity(*actor).map_or("unit", |e| e.label());
            let what = match effect {
                Effect::Nothing if !action.is_none() => " (failed)".to_string(),
                Effect::Pushed { drowned: true, .. } => " (drowned)".to_string(),
                Effect::Damaged { hp: 0, target } => format!(" ({target} down)"),
                _ => String::new(),
            };
            Some(format!("{who} {actor}: {action}{what}"))
        }
        StepEvent::DelayStarted { next } => Some(match next {
            Side::Player => "-- player turn next --".to_string(),
            Side::Enemies => "-- enemy turn next --".to_string(),
        }),
        StepEvent::Finished(outcome) => Some(format!("== {} ==", winner_name(Some(*outcome)))),
        StepEvent::Waiting => None,
    }
}

/// Human name for an outcome.
pub(super) const fn winner_name(winner: Option<Outcome>) -> &'static str {
    match winner {
        Some(Outcome::PlayerWins) => "player wins",
        Some(Outcome::EnemiesWin) => "enemies win",
        None => "undecided (turn cap)",
    }
}

/// Format a session result as human-readable text.
pub(super) fn format_text(result: &SessionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Session Result (seed: {})\n", result.seed));
    output.push_str(&format!("  Outcome: {}\n", winner_name(result.winner)));
    output.push_str(&format!("  Turns: {}\n", result.turns_played));
    output.push_str(&format!("  Player hp: {}\n", result.player_hp));
    output.push_str(&format!("  Enemies alive: {}\n", result.enemies_alive));
    output.push_str(&format!("  Actions: {}\n", result.actions));
    if result.oracle_failures > 0 {
        output.push_str(&format!("  Oracle failures: {}\n", result.oracle_failures));
    }

    output
}

/// Aggregated batch statistics.
#[derive(Debug, Default, Clone, PartialEq)]
pub(super) struct BatchStats {
    /// Sessions that ran to completion.
    pub(super) games_played: u64,
    /// Sessions that could not be started.
    pub(super) games_failed: u64,
    /// Sessions won by the player.
    pub(super) player_wins: u64,
    /// Sessions won by the enemies.
    pub(super) enemy_wins: u64,
    /// Sessions that hit the turn cap.
    pub(super) undecided: u64,
    total_turns: u64,
    total_actions: u64,
    oracle_failures: u64,
}

impl BatchStats {
    /// Fold a batch into statistics.
    pub(super) fn from_results(results: &[Result<SessionResult, SessionError>]) -> Self {
        let mut stats = Self::default();
        for result in results {
            match result {
                Ok(result) => stats.add_result(result),
                Err(_) => stats.games_failed += 1,
            }
        }
        stats
    }

    /// Add a session result to the stats.
    pub(super) fn add_result(&mut self, result: &SessionResult) {
        self.games_played += 1;
        self.total_turns += u64::from(result.turns_played);
        self.total_actions += u64::from(result.actions);
        self.oracle_failures += u64::from(result.oracle_failures);

        match result.winner {
            Some(Outcome::PlayerWins) => self.player_wins += 1,
            Some(Outcome::EnemiesWin) => self.enemy_wins += 1,
            None => self.undecided += 1,
        }
    }

    /// Player win rate (0.0-1.0).
    pub(super) fn win_rate(&self) -> f64 {
        self.ratio(self.player_wins)
    }

    /// Average session length in turns.
    pub(super) fn avg_turns(&self) -> f64 {
        self.ratio(self.total_turns)
    }

    /// Average actions per session.
    pub(super) fn avg_actions(&self) -> f64 {
        self.ratio(self.total_actions)
    }

    /// Average oracle failures per session.
    pub(super) fn avg_oracle_failures(&self) -> f64 {
        self.ratio(self.oracle_failures)
    }

    #[allow(clippy::cast_precision_loss)]
    fn ratio(&self, total: u64) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        total as f64 / self.games_played as f64
    }
}

/// JSON-serializable batch result.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatchResult {
    games_played: u64,
    games_failed: u64,
    player_wins: u64,
    enemy_wins: u64,
    undecided: u64,
    win_rate: f64,
    avg_turns: f64,
    avg_actions: f64,
    avg_oracle_failures: f64,
}

impl JsonBatchResult {
    /// Create from batch stats.
    pub(super) fn from_stats(stats: &BatchStats) -> Self {
        Self {
            games_played: stats.games_played,
            games_failed: stats.games_failed,
            player_wins: stats.player_wins,
            enemy_wins: stats.enemy_wins,
            undecided: stats.undecided,
            win_rate: stats.win_rate(),
            avg_turns: stats.avg_turns(),
            avg_actions: stats.avg_actions(),
            avg_oracle_failures: stats.avg_oracle_failures(),
        }
    }
}

/// Format batch stats as human-readable text.
pub(super) fn format_batch_text(stats: &BatchStats) -> String {
    let mut output = String::new();

    output.push_str(&format!("Batch Results ({} sessions)\n", stats.games_played));
    output.push_str(&format!(
        "  Player wins: {:>5} ({:>5.1}%)\n",
        stats.player_wins,
        stats.win_rate() * 100.0
    ));
    output.push_str(&format!("  Enemy wins:  {:>5}\n", stats.enemy_wins));
    output.push_str(&format!("  Undecided:   {:>5}\n", stats.undecided));
    if stats.games_failed > 0 {
        output.push_str(&format!("  Failed:      {:>5}\n", stats.games_failed));
    }
    output.push_str(&format!("\nAverage session length: {:.1} turns\n", stats.avg_turns()));
    output.push_str(&format!("Average actions: {:.1}\n", stats.avg_actions()));
    output.push_str(&format!(
        "Average oracle failures: {:.2}\n",
        stats.avg_oracle_failures()
    ));

    output
}

/// Format a batch as CSV, one row per session.
pub(super) fn format_batch_csv(results: &[Result<SessionResult, SessionError>]) -> String {
    let mut output =
        String::from("seed,outcome,turns,player_hp,enemies_alive,actions,oracle_failures\n");

    for result in results.iter().flatten() {
        let outcome = match result.winner {
            Some(Outcome::PlayerWins) => "player",
            Some(Outcome::EnemiesWin) => "enemies",
            None => "none",
        };
        output.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            result.seed,
            outcome,
            result.turns_played,
            result.player_hp,
            result.enemies_alive,
            result.actions,
            result.oracle_failures
        ));
    }

    output
}
