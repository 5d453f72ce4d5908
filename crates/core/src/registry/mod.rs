//! Command registry: mnemonic → handler dispatch with per-dialect overrides.
//!
//! A single immutable base registry holds the canonical command set and is
//! built once, shared by every dialect instance. Each [`CommandRegistry`] is
//! a per-dialect overlay on top of that base: `register` only ever touches
//! the overlay, so concurrent dialect instances never interfere, and
//! `resolve` looks the overlay up before the base. At most one handler is
//! bound per mnemonic — a later `register` for the same mnemonic replaces
//! the earlier one.

mod handlers;

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::command::{Command, Param};
use crate::dialect::{self, Dialect};
use crate::state::ParserState;

/// A direct handler function: mutates parser state and may push completed
/// canonical commands.
pub type HandlerFn = fn(&mut ParserState, &LineContext<'_>, &mut Vec<Command>);

/// The tokenized content of one source line, as passed to handlers.
#[derive(Debug)]
pub struct LineContext<'a> {
    /// Uppercased mnemonic that resolved to this handler. Aliases see their
    /// own mnemonic text here, so the commands they emit keep it.
    pub mnemonic: &'a str,
    /// Parsed parameters, in source order.
    pub params: &'a [Param],
    /// The line's comment text (merged with any accumulated comment by the
    /// handler when it finalizes a command).
    pub comment: Option<&'a str>,
    /// 1-based source line number.
    pub line: usize,
}

impl LineContext<'_> {
    /// Numeric value of the first parameter with the given letter.
    pub fn number(&self, letter: char) -> Option<f64> {
        self.params.iter().find_map(|p| match &p.value {
            crate::command::ParamValue::Number(v) if p.letter == letter => Some(*v),
            _ => None,
        })
    }
}

/// A named post-processing transform applied by a composed handler after the
/// base handler it wraps has run to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Append a fixed annotation to each emitted command's comment,
    /// space-separated from any existing comment text.
    AppendComment(&'static str),
}

impl Transform {
    fn apply(&self, cmd: &mut Command) {
        match self {
            Transform::AppendComment(suffix) => {
                cmd.comment = Some(match cmd.comment.take() {
                    Some(mut text) if !text.is_empty() => {
                        text.push(' ');
                        text.push_str(suffix);
                        text
                    }
                    _ => (*suffix).to_string(),
                });
            }
        }
    }
}

/// A handler bound to a mnemonic.
#[derive(Debug, Clone)]
pub enum Handler {
    /// A plain handler function.
    Direct(HandlerFn),
    /// Invoke the handler bound to another mnemonic. Resolution follows the
    /// normal overlay-then-base order, so an alias tracks any override of
    /// its target within the same dialect.
    Alias(&'static str),
    /// Run the BASE handler for `base_of` to completion, observe the
    /// commands it emitted, then apply `transform` to them.
    Composed {
        /// Mnemonic whose base handler is delegated to.
        base_of: &'static str,
        /// Transform applied to the commands the base handler emitted.
        transform: Transform,
    },
}

/// Outcome of dispatching one line through the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A handler ran.
    Handled,
    /// No handler is bound to the mnemonic (or an alias chain dead-ends).
    Unknown,
}

/// Alias chains longer than this are treated as unresolvable. Keeps a
/// mistakenly cyclic override list from hanging the parser.
const MAX_ALIAS_DEPTH: usize = 8;

fn base() -> &'static HashMap<&'static str, Handler> {
    static BASE: OnceLock<HashMap<&'static str, Handler>> = OnceLock::new();
    BASE.get_or_init(|| {
        HashMap::from([
            ("G0", Handler::Direct(handlers::travel as HandlerFn)),
            ("G1", Handler::Direct(handlers::linear_motion as HandlerFn)),
            ("G2", Handler::Direct(handlers::arc_motion as HandlerFn)),
            ("G3", Handler::Direct(handlers::arc_motion as HandlerFn)),
            ("G4", Handler::Direct(handlers::dwell as HandlerFn)),
            ("M3", Handler::Direct(handlers::extruder_on as HandlerFn)),
            ("M5", Handler::Direct(handlers::extruder_off as HandlerFn)),
        ])
    })
}

/// Per-dialect command registry: a mutable overlay over the shared base.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    overrides: HashMap<String, Handler>,
}

impl CommandRegistry {
    /// An empty overlay — pure base vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry for a dialect by applying its override list, in
    /// order, on top of the base.
    pub fn for_dialect(dialect: Dialect) -> Self {
        let mut registry = Self::new();
        for (mnemonic, handler) in dialect::overrides(dialect) {
            registry.register(*mnemonic, handler.clone());
        }
        registry
    }

    /// Add or replace the handler for `mnemonic` in this dialect's overlay.
    /// The shared base is never touched.
    pub fn register(&mut self, mnemonic: impl Into<String>, handler: Handler) {
        self.overrides.insert(mnemonic.into(), handler);
    }

    /// Resolve a mnemonic: the dialect's handler if present, else the base
    /// handler, else `None`.
    pub fn resolve(&self, mnemonic: &str) -> Option<&Handler> {
        self.overrides
            .get(mnemonic)
            .or_else(|| base().get(mnemonic))
    }

    /// Follow alias/composition links to the canonical mnemonic a name
    /// ultimately executes. Writers use this to apply state tracking to
    /// vendor-named commands.
    pub fn canonical_mnemonic<'a>(&'a self, mnemonic: &'a str) -> Option<&'a str> {
        let mut current = mnemonic;
        for _ in 0..MAX_ALIAS_DEPTH {
            match self.resolve(current)? {
                Handler::Direct(_) => return Some(current),
                Handler::Alias(target) => current = target,
                Handler::Composed { base_of, .. } => return Some(base_of),
            }
        }
        None
    }

    /// Dispatch one line. Handlers may mutate `state` and push completed
    /// commands onto `out`; on `Dispatch::Unknown` both are untouched.
    pub fn dispatch(
        &self,
        state: &mut ParserState,
        ctx: &LineContext<'_>,
        out: &mut Vec<Command>,
    ) -> Dispatch {
        match self.resolve(ctx.mnemonic) {
            Some(handler) => self.run(handler, state, ctx, out, 0),
            None => Dispatch::Unknown,
        }
    }

    fn run(
        &self,
        handler: &Handler,
        state: &mut ParserState,
        ctx: &LineContext<'_>,
        out: &mut Vec<Command>,
        depth: usize,
    ) -> Dispatch {
        if depth >= MAX_ALIAS_DEPTH {
            return Dispatch::Unknown;
        }
        match handler {
            Handler::Direct(f) => {
                f(state, ctx, out);
                Dispatch::Handled
            }
            Handler::Alias(target) => match self.resolve(target) {
                Some(inner) => self.run(inner, state, ctx, out, depth + 1),
                None => Dispatch::Unknown,
            },
            Handler::Composed { base_of, transform } => {
                // Delegation is to the BASE handler by definition, so a
                // composed override of a mnemonic can wrap the canonical
                // behavior of that same mnemonic without recursing.
                let Some(inner) = base().get(base_of) else {
                    return Dispatch::Unknown;
                };
                let emitted_from = out.len();
                let dispatched = self.run(inner, state, ctx, out, depth + 1);
                if dispatched == Dispatch::Handled {
                    for cmd in &mut out[emitted_from..] {
                        transform.apply(cmd);
                    }
                }
                dispatched
            }
        }
    }
}
