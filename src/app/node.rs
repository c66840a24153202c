//! Node loop: the outermost cooperative control loop of one board.
//!
//! Each cycle, strictly in sequence:
//!
//! 1. take at most one command line from the channel and parse it;
//! 2. hand a parsed command to the subsystem (malformed lines are logged
//!    and dropped, nothing is sent back);
//! 3. run the subsystem's per-cycle update at a fresh clock reading;
//! 4. emit a heartbeat when one is due.
//!
//! The loop is generic over the subsystem, its hardware and the transport,
//! so the same code runs on the board, in the simulator and in tests.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::app::commands::ParseCommand;
use crate::app::events::{SubsystemId, TelemetryEvent, TelemetryKind};
use crate::app::ports::{EventSink, TimePort};
use crate::channel::transport::Transport;
use crate::channel::CommandChannel;
use crate::tick::Tick;

/// A subsystem policy the node loop can drive on hardware `H`.
pub trait Subsystem<H> {
    type Command: ParseCommand;

    fn id(&self) -> SubsystemId;

    /// Drive outputs to their safe defaults and announce readiness.
    fn start(&mut self, now: Tick, hw: &mut H, sink: &mut impl EventSink);

    /// Act on one parsed command.  `clock` is read again after any
    /// blocking wait the command performs.
    fn handle_command(&mut self, cmd: Self::Command, clock: &impl TimePort, hw: &mut H, sink: &mut impl EventSink);

    /// Per-cycle evaluation, called whether or not a command arrived.
    fn update(&mut self, now: Tick, hw: &mut H, sink: &mut impl EventSink);

    /// Short label of the current state for heartbeats.
    fn state_label(&self) -> &'static str;
}

pub struct NodeLoop<S, T: Transport> {
    subsystem: S,
    channel: CommandChannel<T>,
    poll_interval_ms: u32,
    heartbeat_interval_ms: u32,
    boot: Tick,
    last_heartbeat: Tick,
    cycles: u64,
    rejected: u32,
}

impl<S, T: Transport> NodeLoop<S, T> {
    pub fn new(subsystem: S, transport: T, poll_interval_ms: u32, heartbeat_interval_secs: u32) -> Self {
        Self {
            subsystem,
            channel: CommandChannel::new(transport),
            poll_interval_ms,
            heartbeat_interval_ms: heartbeat_interval_secs.saturating_mul(1_000),
            boot: Tick::ZERO,
            last_heartbeat: Tick::ZERO,
            cycles: 0,
            rejected: 0,
        }
    }

    pub fn subsystem(&self) -> &S {
        &self.subsystem
    }

    pub fn channel(&self) -> &CommandChannel<T> {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut CommandChannel<T> {
        &mut self.channel
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Command lines dropped because they did not parse.
    pub fn rejected(&self) -> u32 {
        self.rejected
    }

    /// Boot the subsystem.  Call once before the first cycle.
    pub fn start<H>(&mut self, clock: &impl TimePort, hw: &mut H)
    where
        S: Subsystem<H>,
    {
        let now = clock.now();
        self.boot = now;
        self.last_heartbeat = now;
        info!("{} node starting, poll {} ms", self.subsystem.id().as_str(), self.poll_interval_ms);
        self.subsystem.start(now, hw, &mut self.channel);
    }

    /// One full control cycle.
    pub fn run_cycle<H>(&mut self, clock: &impl TimePort, hw: &mut H)
    where
        S: Subsystem<H>,
    {
        self.cycles = self.cycles.wrapping_add(1);

        if let Some(line) = self.channel.poll_line() {
            match S::Command::parse(&line) {
                Ok(cmd) => {
                    info!("{} <- {cmd:?}", self.subsystem.id().as_str());
                    self.subsystem
                        .handle_command(cmd, clock, hw, &mut self.channel);
                }
                Err(e) => {
                    self.rejected = self.rejected.wrapping_add(1);
                    warn!("{}: dropped {:?}: {e}", self.subsystem.id().as_str(), line.as_str());
                }
            }
        }

        let now = clock.now();
        self.subsystem.update(now, hw, &mut self.channel);
        self.heartbeat::<H>(now);
    }

    /// Run forever, pacing cycles with `delay`.
    pub fn run<H>(&mut self, clock: &impl TimePort, delay: &mut impl DelayNs, hw: &mut H) -> !
    where
        S: Subsystem<H>,
    {
        self.start(clock, hw);
        loop {
            self.run_cycle(clock, hw);
            delay.delay_ms(self.poll_interval_ms);
        }
    }

    fn heartbeat<H>(&mut self, now: Tick)
    where
        S: Subsystem<H>,
    {
        if self.heartbeat_interval_ms == 0
            || now.elapsed_since(self.last_heartbeat) < self.heartbeat_interval_ms
        {
            return;
        }
        self.last_heartbeat = now;
        let event = TelemetryEvent::with_args(
            self.subsystem.id(),
            TelemetryKind::Heartbeat,
            format_args!(
                "uptime_ms={} state={}",
                now.elapsed_since(self.boot),
                self.subsystem.state_label()
            ),
        );
        self.channel.emit(&event);
    }
}
