//! Terminal runner (default binary).
//!
//! Drives the simulation at a fixed 60 FPS and maps crossterm key events
//! onto the orchestrator's input alphabet. Key releases feed the in-game
//! hold timers, so the kitty keyboard protocol is requested where the
//! terminal supports it.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use cubetris::core::game::Game;
use cubetris::input::map::{map_key, should_quit, KeyCommand};
use cubetris::term::view::TerminalView;
use cubetris::types::{InputEvent, Mode, FPS};

fn main() -> Result<()> {
    let seed = std::process::id();
    let mut term = TerminalView::enter()?;

    let supports_releases = crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false);
    if supports_releases {
        execute!(
            std::io::stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }

    let result = run(&mut term, seed);

    // Always try to restore terminal state.
    if supports_releases {
        let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
    }
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalView, seed: u32) -> Result<()> {
    let mut game = Game::new(seed);
    let frame = Duration::from_secs_f64(1.0 / FPS);
    let mut last_tick = Instant::now();
    let mut shift_down = false;

    loop {
        term.draw(&game)?;

        let timeout = frame
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Shift state rides along on every key event.
                let shift = key.modifiers.contains(KeyModifiers::SHIFT);
                if shift != shift_down {
                    shift_down = shift;
                    game.handle_event(if shift {
                        InputEvent::ModifierPressed
                    } else {
                        InputEvent::ModifierReleased
                    });
                }

                match key.kind {
                    KeyEventKind::Press => {
                        if should_quit(&key) {
                            return Ok(());
                        }
                        match map_key(key.code) {
                            Some(KeyCommand::Pause) if game.mode() == Mode::Home => {
                                return Ok(());
                            }
                            Some(KeyCommand::Pause) => game.handle_event(InputEvent::PauseToggle),
                            Some(KeyCommand::Hold) => game.handle_event(InputEvent::Hold),
                            Some(KeyCommand::Input(code)) => {
                                game.handle_event(InputEvent::Pressed(code))
                            }
                            None => {}
                        }
                    }
                    // Terminal auto-repeat; the hold timers repeat on their own.
                    KeyEventKind::Repeat => {}
                    KeyEventKind::Release => {
                        if let Some(KeyCommand::Input(code)) = map_key(key.code) {
                            game.handle_event(InputEvent::Released(code));
                        }
                    }
                }
            }
        }

        if last_tick.elapsed() >= frame {
            last_tick = Instant::now();
            game.tick();
        }
    }
}
