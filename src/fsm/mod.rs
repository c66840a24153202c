//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern, shared by every motion controller:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StateTable<C>                                               │
//! │  ┌────────────────┬───────────┬──────────┬────────────────┐  │
//! │  │ StateId        │ on_enter  │ on_exit  │ on_update      │  │
//! │  ├────────────────┼───────────┼──────────┼────────────────┤  │
//! │  │ Idle           │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Opt<> │  │
//! │  │ MovingForward  │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Opt<> │  │
//! │  │ MovingBackward │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Opt<> │  │
//! │  │ Fault          │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Opt<> │  │
//! │  └────────────────┴───────────┴──────────┴────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each cycle the engine calls `on_update` for the **current** state.
//! If it returns `Some(next_id)`, the engine runs `on_exit` for the
//! current state, then `on_enter` for the next, and updates the
//! current pointer.  The table is generic over the context type so each
//! subsystem supplies its own handlers over a
//! [`MotionContext`](context::MotionContext) carrying its policy.

pub mod context;

use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of the motion controller states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Idle = 0,
    /// Raising (lift) / moving up (elevator).
    MovingForward = 1,
    /// Lowering (lift) / moving down (elevator).
    MovingBackward = 2,
    Fault = 3,
}

impl StateId {
    /// Number of states; sizes the table array.
    pub const COUNT: usize = 4;

    /// Convert a table index back to `StateId`.  Panics on out-of-range in
    /// debug builds; returns `Fault` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::MovingForward,
            2 => Self::MovingBackward,
            3 => Self::Fault,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Fault
            }
        }
    }

    /// `true` for the states in which the motor may be energised.
    pub fn is_moving(self) -> bool {
        matches!(self, Self::MovingForward | Self::MovingBackward)
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn<C> = fn(&mut C);

/// Signature for the per-cycle update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn<C> = fn(&mut C) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
pub struct StateDescriptor<C> {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn<C>>,
    pub on_exit: Option<StateActionFn<C>>,
    pub on_update: StateUpdateFn<C>,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
pub struct Fsm<C> {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor<C>; StateId::COUNT],
    current: usize,
    /// Number of transitions taken since start.
    transitions: u32,
}

impl<C> Fsm<C> {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor<C>; StateId::COUNT], initial: StateId) -> Self {
        debug_assert!(
            table.iter().enumerate().all(|(i, d)| d.id as usize == i),
            "state table out of order"
        );
        Self {
            table,
            current: initial as usize,
            transitions: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    pub fn start(&mut self, ctx: &mut C) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one cycle.  Returns the state entered, if any.
    pub fn tick(&mut self, ctx: &mut C) -> Option<StateId> {
        let next = (self.table[self.current].on_update)(ctx);
        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
        next
    }

    /// Force an immediate transition (commands, emergency stop).  A request
    /// for the current state is a no-op.
    pub fn force_transition(&mut self, next: StateId, ctx: &mut C) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    /// Name of the current state, as given in the table.
    pub fn current_name(&self) -> &'static str {
        self.table[self.current].name
    }

    pub fn transition_count(&self) -> u32 {
        self.transitions
    }

    fn transition(&mut self, next_id: StateId, ctx: &mut C) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.transitions = self.transitions.wrapping_add(1);

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
