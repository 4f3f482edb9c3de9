//! Plain-text renderer for terminal and log output.

use std::fmt::Write as _;

use crate::game::{Coord, Entity, Outcome, Phase, Role, Side, Terrain, EnemyKind};
use crate::session::Snapshot;

/// Render a snapshot as text.
///
/// Output format:
/// ```text
/// Turn 3 | player turn | 2 actions left
/// +-------------+
/// | . ^ . . ~ . |
/// | . @ . . . . |
/// | . . . r . . |
/// | . . x . . . |
/// | ~ . . . m . |
/// | . . . . . . |
/// +-------------+
/// Legend: .=grass ^=mountain ~=water @=player r=ranged m=melee x=fallen
///
/// player  #0 at (1, 1)  hp 5/5
/// ranged  #1 at (3, 2)  hp 3/3
/// melee   #2 at (4, 4)  hp 1/4
/// ```
#[must_use]
pub fn render_ascii(snapshot: &Snapshot<'_>) -> String {
    let mut output = String::new();
    render_status(&mut output, snapshot);
    render_map(&mut output, snapshot);
    output.push_str("Legend: .=grass ^=mountain ~=water @=player r=ranged m=melee x=fallen\n\n");
    for entity in snapshot.world.entities() {
        render_entity(&mut output, entity);
    }
    output
}

/// One-line phase summary, shared with the TUI header.
#[must_use]
pub fn status_line(snapshot: &Snapshot<'_>) -> String {
    let turn = snapshot.turn;
    let phase = match snapshot.phase {
        Phase::PlayerTurn => format!("player turn | {} actions left", turn.actions_remaining),
        Phase::EnemyTurn => format!("enemy turn | {} actions left", turn.actions_remaining),
        Phase::InterTurnDelay { next } => {
            let next = match next {
                Side::Player => "player",
                Side::Enemies => "enemies",
            };
            if snapshot.paused {
                format!("paused | {next} next")
            } else {
                format!("{next} next")
            }
        }
        Phase::Finished(Outcome::PlayerWins) => "player wins".to_string(),
        Phase::Finished(Outcome::EnemiesWin) => "enemies win".to_string(),
    };
    format!("Turn {} | {phase}", turn.turn_number)
}

/// Glyph for a cell: living unit, then fallen unit, then terrain.
#[must_use]
pub fn cell_glyph(snapshot: &Snapshot<'_>, coord: Coord) -> char {
    let world = snapshot.world;
    if let Some(entity) = world.living_at(coord) {
        return unit_glyph(entity);
    }
    if world.entities().iter().any(|e| e.pos == coord) {
        return 'x';
    }
    match world.map().terrain(coord) {
        Some(Terrain::Grass) => '.',
        Some(Terrain::Mountain) => '^',
        Some(Terrain::Water) => '~',
        None => ' ',
    }
}

/// Glyph for a unit regardless of whether it is alive.
#[must_use]
pub const fn unit_glyph(entity: &Entity) -> char {
    match entity.role {
        Role::Player => '@',
        Role::Enemy(EnemyKind::Ranged) => 'r',
        Role::Enemy(EnemyKind::Melee) => 'm',
    }
}

fn render_status(output: &mut String, snapshot: &Snapshot<'_>) {
    output.push_str(&status_line(snapshot));
    output.push('\n');
}

fn render_map(output: &mut String, snapshot: &Snapshot<'_>) {
    let map = snapshot.world.map();
    let border = format!("+{}+\n", "-".repeat(usize::from(map.width()) * 2 + 1));

    output.push_str(&border);
    for y in 0..i32::from(map.height()) {
        output.push_str("| ");
        for x in 0..i32::from(map.width()) {
            output.push(cell_glyph(snapshot, Coord::new(x, y)));
            output.push(' ');
        }
        output.push_str("|\n");
    }
    output.push_str(&border);
}

fn render_entity(output: &mut String, entity: &Entity) {
    let _ = write!(
        output,
        "{:<7} {} at {}  hp {}/{}",
        entity.label(),
        entity.id,
        entity.pos,
        entity.hp,
        entity.max_hp
    );
    if !entity.is_alive() {
        output.push_str("  [down]");
    }
    output.push('\n');
}
