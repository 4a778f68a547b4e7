mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wave_shooter::compute::{init_state, tick};
use wave_shooter::config::GameConfig;
use wave_shooter::entities::{Horizontal, TickInput};
use wave_shooter::state::GameState;

/// Frames a direction key stays held after its last press or repeat event.
/// Terminals without release events rely on OS key repeat (15 Hz or faster)
/// to refresh it; 8 frames is about 133 ms at 60 Hz.
const HOLD_WINDOW: u64 = 8;

/// Whether `key` is still inside its hold window.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .is_some_and(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
}

fn held_any(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

/// Pointer press for this frame. A mouse click fires while playing and
/// restarts when over; the restart key counts only once the session is over.
fn pointer_press(mouse_down: bool, restart_key: bool, session_over: bool) -> bool {
    mouse_down || (restart_key && session_over)
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Direction keys use a held-key model: `key_frame` records the frame of the
/// last press/repeat event per key, and a key counts as held while that
/// record is fresh.  Fire and restart are edge-triggered: only a fresh
/// `Press` (or mouse-down) on this frame counts.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rng: &mut StdRng,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let frame_len = Duration::from_secs_f32(state.config.dt());

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        let mut fire_pressed = false;
        let mut mouse_down = false;
        let mut restart_key = false;

        // ── Input ─────────────────────────────────────────────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(());
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            KeyCode::Char(' ') => fire_pressed = true,
                            KeyCode::Char('r') | KeyCode::Char('R') => restart_key = true,
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(mouse) => {
                    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                        mouse_down = true;
                    }
                }
                _ => {}
            }
        }

        let left = held_any(
            &key_frame,
            &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
            frame,
        );
        let right = held_any(
            &key_frame,
            &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
            frame,
        );
        let horizontal = match (left, right) {
            (true, false) => Horizontal::Left,
            (false, true) => Horizontal::Right,
            _ => Horizontal::None,
        };

        // The viewport can change between any two frames.
        let (width, height) = terminal::size()?;
        let arena = display::arena_for_terminal(width, height);
        state.resize(arena.width, arena.height);

        let input = TickInput {
            horizontal,
            fire_pressed,
            pointer_pressed: pointer_press(mouse_down, restart_key, state.session.is_over()),
        };
        tick(state, &input, rng);

        display::render(out, state, width, height)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_len {
            std::thread::sleep(frame_len - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    // Logs go to stderr and are off unless RUST_LOG is set; redirect stderr
    // to a file to keep them out of the game screen.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = GameConfig::load_or_default();
    config
        .validate()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    info!("Wave Shooter v{}", env!("CARGO_PKG_VERSION"));

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Release and repeat events where the terminal supports them; the hold
    // window covers the rest.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads happen on their own thread; the loop only polls the
    // channel.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = terminal::size().and_then(|(width, height)| {
        let arena = display::arena_for_terminal(width, height);
        let mut state = init_state(config, arena.width, arena.height, &mut rng);
        game_loop(&mut out, &mut state, &mut rng, &rx)
    });

    // Restore the terminal whatever the loop returned.
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
