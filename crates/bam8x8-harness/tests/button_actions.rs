//! End-to-end button path: simulated edge and hold-tick interrupts feeding
//! the state machine, consumed through the application handle's poll.

use bam8x8::{Action, Builder, Buttons, Matrix, Painter, Shared, IDLE_MASK, LEFT_BIT, RIGHT_BIT};
use bam8x8_harness::{SimButtons, SimMatrix};

fn setup() -> (Painter, Buttons<SimButtons>) {
    let shared: &'static Shared = Box::leak(Box::new(Shared::new()));
    let config = Builder::new().build().unwrap();
    let (sim, _log) = SimMatrix::new();
    let (painter, _scanout) = Matrix::claim(shared, config.clone(), sim).unwrap().split();
    let buttons = Buttons::new(shared, &config, SimButtons::new());
    (painter, buttons)
}

fn edge(buttons: &mut Buttons<SimButtons>, mask: u8) {
    buttons.interface_mut().mask = mask;
    buttons.on_edge();
}

/// Tick the hold timer up to `n` times, stopping when the machine gates it
/// off, the way the hardware interrupt would.
fn ticks(buttons: &mut Buttons<SimButtons>, n: u32) {
    for _ in 0..n {
        if !buttons.interface().timer_running {
            break;
        }
        buttons.on_hold_tick();
    }
}

#[test]
fn tap_reaches_the_application_poll() {
    let (mut painter, mut buttons) = setup();

    edge(&mut buttons, IDLE_MASK & !LEFT_BIT);
    ticks(&mut buttons, 5);
    edge(&mut buttons, IDLE_MASK);

    assert_eq!(painter.poll_action(), Action::TapLeft);
    // Polling consumed it.
    assert_eq!(painter.poll_action(), Action::None);
}

#[test]
fn hold_reaches_the_application_poll() {
    let (mut painter, mut buttons) = setup();

    edge(&mut buttons, IDLE_MASK & !RIGHT_BIT);
    ticks(&mut buttons, 200);

    assert_eq!(painter.poll_action(), Action::HoldRight);
    // The release after a latched hold yields nothing further.
    edge(&mut buttons, IDLE_MASK);
    assert_eq!(painter.poll_action(), Action::None);
}

#[test]
fn chorded_hold_reaches_the_application_poll() {
    let (mut painter, mut buttons) = setup();

    edge(&mut buttons, IDLE_MASK & !LEFT_BIT);
    ticks(&mut buttons, 3);
    edge(&mut buttons, 0);
    ticks(&mut buttons, 200);

    assert_eq!(painter.poll_action(), Action::HoldBoth);
}
