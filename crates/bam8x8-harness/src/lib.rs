//! Host-side simulation harness for the matrix refresh engine.
//!
//! [`SimMatrix`] implements [`MatrixInterface`] against a timestamped event
//! log, so scenario tests can drive [`Scanout::on_timer`] like the hardware
//! timer would and then reconstruct what the panel physically showed: which
//! columns were selected, in what order, with which drive bytes, and for how
//! long.

use std::sync::{Arc, Mutex};

use bam8x8::{ButtonInterface, DriveMasks, MatrixInterface, Scanout, DRIVE_GROUPS, HEIGHT, WIDTH};

/// One hardware operation issued by the refresh routine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// A column select line was turned off.
    Deselect(u8),
    /// Drive-group bytes were loaded onto the drive lines.
    Load([u8; DRIVE_GROUPS]),
    /// A column select line was turned on.
    Select(u8),
    /// The refresh timer was armed with a next-fire interval.
    Arm(u16),
}

/// Everything the simulated hardware was told to do, in order.
#[derive(Default)]
pub struct SimLog {
    pub events: Vec<Event>,
}

/// One completed column slot: the column lit, the drive bytes shown on it,
/// and the timer interval its slot was armed with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    pub column: u8,
    pub groups: [u8; DRIVE_GROUPS],
    pub interval: u16,
}

impl SimLog {
    /// Group the raw event stream into column slots.
    ///
    /// A slot is a `Load`/`Select` pair closed by the `Arm` that times it;
    /// blanking traffic from `begin` carries no `Select` and is skipped.
    pub fn slots(&self) -> Vec<Slot> {
        let mut slots = Vec::new();
        let mut groups = [0; DRIVE_GROUPS];
        let mut column = None;
        for event in &self.events {
            match *event {
                Event::Load(g) => groups = g,
                Event::Select(c) => column = Some(c),
                Event::Arm(interval) => {
                    if let Some(c) = column.take() {
                        slots.push(Slot {
                            column: c,
                            groups,
                            interval,
                        });
                    }
                }
                Event::Deselect(_) => {}
            }
        }
        slots
    }

    /// Drop everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// Simulated matrix hardware: records instead of driving pins.
pub struct SimMatrix {
    log: Arc<Mutex<SimLog>>,
}

impl SimMatrix {
    /// Create the simulated hardware and a handle onto its event log.
    pub fn new() -> (Self, Arc<Mutex<SimLog>>) {
        let log = Arc::new(Mutex::new(SimLog::default()));
        (Self { log: log.clone() }, log)
    }

    fn push(&self, event: Event) {
        self.log.lock().unwrap().events.push(event);
    }
}

impl MatrixInterface for SimMatrix {
    fn deselect_column(&mut self, col: u8) {
        self.push(Event::Deselect(col));
    }

    fn select_column(&mut self, col: u8) {
        self.push(Event::Select(col));
    }

    fn write_groups(&mut self, groups: [u8; DRIVE_GROUPS]) {
        self.push(Event::Load(groups));
    }

    fn set_next_interval(&mut self, ticks: u16) {
        self.push(Event::Arm(ticks));
    }
}

/// Simulated button hardware: a scriptable level mask and a hold-timer gate.
pub struct SimButtons {
    /// Current 2-bit active-low level mask, as an edge handler would read it.
    pub mask: u8,
    /// Whether the hold-tick timer interrupt is enabled.
    pub timer_running: bool,
}

impl SimButtons {
    /// Create the simulated buttons, both released, timer stopped.
    pub fn new() -> Self {
        Self {
            mask: 0b11,
            timer_running: false,
        }
    }
}

impl Default for SimButtons {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonInterface for SimButtons {
    fn read_mask(&mut self) -> u8 {
        self.mask
    }

    fn restart_hold_timer(&mut self) {
        self.timer_running = true;
    }

    fn stop_hold_timer(&mut self) {
        self.timer_running = false;
    }
}

/// Fire the refresh timer `ticks` times in a row.
pub fn drive<I: MatrixInterface>(scanout: &mut Scanout<I>, ticks: usize) {
    for _ in 0..ticks {
        scanout.on_timer();
    }
}

/// Number of timer fires in one full frame (8 columns x 8 planes).
pub const TICKS_PER_FRAME: usize = WIDTH * HEIGHT;

/// Accumulate each pixel's effective on-time over a run of slots.
///
/// A slot's effective on-time is its armed interval plus the interrupt
/// overhead the interval was shortened by. The result is indexed `[y][x]`;
/// for an intensity `i` pixel scanned over one full frame it comes to
/// exactly `i * base_unit` ticks, which is the bit-angle modulation
/// linearity law.
pub fn on_times(slots: &[Slot], masks: &DriveMasks, isr_overhead: u16) -> [[u32; WIDTH]; HEIGHT] {
    let mut times = [[0u32; WIDTH]; HEIGHT];
    for slot in slots {
        let effective = u32::from(slot.interval) + u32::from(isr_overhead);
        for (x, mask) in masks.iter().enumerate() {
            let lit = slot.groups[0] & mask[0] | slot.groups[1] & mask[1] | slot.groups[2] & mask[2];
            if lit != 0 {
                times[slot.column as usize][x] += effective;
            }
        }
    }
    times
}
