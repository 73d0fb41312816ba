//! Weapon trace diagnostics.

use bevy::prelude::*;

/// Diagnostic switches, fixed at startup from settings.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct WeaponDiagnostics {
    /// Draw every weapon trace for a second
    pub draw_traces: bool,
}

/// Emitted for each resolved trace while trace drawing is enabled.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DebugTraceEvent {
    pub start: Vec3,
    pub end: Vec3,
}

const TRACE_LINE_SECONDS: f32 = 1.0;

/// Trace lines still on screen.
#[derive(Resource, Default)]
struct DebugTraceLines {
    lines: Vec<(Vec3, Vec3, Timer)>,
}

/// Draws weapon traces with gizmos. Needs the renderer, so only the game
/// binary installs it.
pub struct CombatDebugPlugin;

impl Plugin for CombatDebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugTraceLines>()
            .add_systems(Update, (collect_trace_lines, draw_trace_lines).chain());
    }
}

fn collect_trace_lines(
    mut traces: EventReader<DebugTraceEvent>,
    mut lines: ResMut<DebugTraceLines>,
) {
    for trace in traces.read() {
        lines.lines.push((
            trace.start,
            trace.end,
            Timer::from_seconds(TRACE_LINE_SECONDS, TimerMode::Once),
        ));
    }
}

fn draw_trace_lines(time: Res<Time>, mut lines: ResMut<DebugTraceLines>, mut gizmos: Gizmos) {
    lines.lines.retain_mut(|(start, end, timer)| {
        gizmos.line(*start, *end, Color::WHITE);
        !timer.tick(time.delta()).finished()
    });
}
