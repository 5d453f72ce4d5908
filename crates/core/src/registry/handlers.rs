//! Canonical command handlers shared by every dialect.
//!
//! Handlers mutate [`ParserState`] and finalize canonical [`Command`]s. The
//! emitted command carries the mnemonic the line actually used, so vendor
//! aliases survive into canonical form while their state effects match the
//! command they delegate to.

use crate::command::Command;
use crate::registry::LineContext;
use crate::state::ParserState;

/// Finalize the line as a canonical command, attaching any accumulated
/// comment text.
fn finish(state: &mut ParserState, ctx: &LineContext<'_>, out: &mut Vec<Command>) {
    out.push(Command {
        mnemonic: ctx.mnemonic.to_string(),
        params: ctx.params.to_vec(),
        comment: state.take_comment(ctx.comment),
        line: Some(ctx.line),
    });
}

/// Update position and feedrate from motion parameters. Absent axes keep
/// their previous value (G-code motion words are modal per axis).
fn apply_motion(state: &mut ParserState, ctx: &LineContext<'_>) {
    if let Some(x) = ctx.number('X') {
        state.position.x = x;
    }
    if let Some(y) = ctx.number('Y') {
        state.position.y = y;
    }
    if let Some(z) = ctx.number('Z') {
        state.position.z = z;
    }
    if let Some(f) = ctx.number('F') {
        state.feedrate = Some(f);
    }
}

/// `G0` — rapid travel move.
pub(super) fn travel(state: &mut ParserState, ctx: &LineContext<'_>, out: &mut Vec<Command>) {
    apply_motion(state, ctx);
    finish(state, ctx, out);
}

/// `G1` — linear deposition/cutting move.
pub(super) fn linear_motion(
    state: &mut ParserState,
    ctx: &LineContext<'_>,
    out: &mut Vec<Command>,
) {
    apply_motion(state, ctx);
    finish(state, ctx, out);
}

/// `G2`/`G3` — clockwise/counter-clockwise arc. The endpoint updates the
/// position; `I`/`J`/`K` center offsets pass through untouched.
pub(super) fn arc_motion(state: &mut ParserState, ctx: &LineContext<'_>, out: &mut Vec<Command>) {
    apply_motion(state, ctx);
    finish(state, ctx, out);
}

/// `G4` — dwell. No state effect beyond the emitted command.
pub(super) fn dwell(state: &mut ParserState, ctx: &LineContext<'_>, out: &mut Vec<Command>) {
    finish(state, ctx, out);
}

/// Nozzle index addressed by a `P` parameter, defaulting to nozzle 0.
fn nozzle_index(ctx: &LineContext<'_>) -> usize {
    ctx.number('P').map(|v| v as usize).unwrap_or(0)
}

/// `M3` — extruder on (bead start).
pub(super) fn extruder_on(state: &mut ParserState, ctx: &LineContext<'_>, out: &mut Vec<Command>) {
    state.set_extruder(nozzle_index(ctx), true);
    finish(state, ctx, out);
}

/// `M5` — extruder off (bead end).
pub(super) fn extruder_off(state: &mut ParserState, ctx: &LineContext<'_>, out: &mut Vec<Command>) {
    state.set_extruder(nozzle_index(ctx), false);
    finish(state, ctx, out);
}
