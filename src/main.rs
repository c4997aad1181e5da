/// Entry point and frame loop.

mod config;
mod game;
mod store;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use game::engine::{Activation, GameEngine};
use store::FileStore;
use ui::input::InputState;
use ui::renderer::TermRenderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

const KEYS_QUIT: &[KeyCode] = &[
    KeyCode::Char('q'),
    KeyCode::Char('Q'),
    KeyCode::Esc,
];

fn main() {
    let config = GameConfig::load();

    let mut renderer = TermRenderer::new(&config.timing, &config.ui);
    let mut engine = GameEngine::new(config.rules.clone(), FileStore::new());

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut engine, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Hue Hunt!");
    println!("Best level reached: {}", engine.highscore());
}

fn game_loop(
    engine: &mut GameEngine<FileStore>,
    renderer: &mut TermRenderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = InputState::new();
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.timing.tick_rate_ms);

    engine.start(renderer)?;

    loop {
        input.drain_events();

        if input.ctrl_c_pressed() || input.any_pressed(KEYS_QUIT) {
            break;
        }

        for &(col, row) in input.clicks() {
            match renderer.activation_at(col, row) {
                Some(Activation::Target) => engine.on_target_hit(renderer)?,
                Some(Activation::Decoy) => engine.on_target_missed(renderer)?,
                None => {} // click outside the board
            }
        }

        if last_tick.elapsed() >= tick_rate {
            engine.tick(renderer)?;
            last_tick = Instant::now();
        }

        renderer.draw()?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}
