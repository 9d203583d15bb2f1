/*
Plinko: drop balls through a peg pyramid and bet on where they land.

Space or the Drop button launches a ball with the wager typed in the field.
Set PLINKO_CONFIG to a JSON file to change the board, and RUST_LOG for logs.
*/

use macroquad::miniquad::date;
use macroquad::prelude::*;

use plinko::GameConfig;
use plinko::modules::events::Feedback;
use plinko::modules::game::Game;
use plinko::modules::notice::Notice;
use plinko::modules::render::{draw_hud, draw_world};
use plinko::modules::scale::use_virtual_resolution;
use plinko::modules::text_button::TextButton;
use plinko::modules::text_input::WagerField;

/// Set up window settings before the app runs
fn window_conf() -> Conf {
    Conf {
        window_title: "plinko".to_string(),
        window_width: 1024,
        window_height: 768,
        fullscreen: false,
        high_dpi: true,
        window_resizable: true,
        sample_count: 4, // MSAA
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let config = match GameConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            return;
        }
    };
    let (width, height) = (config.world_width, config.world_height);
    let wagering = config.wagering;
    let default_wager = config.default_wager.to_string();

    let seed = date::now().to_bits();
    let mut game = match Game::with_rapier(config, seed) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Failed to build the board: {e}");
            return;
        }
    };
    log::info!("Seed {seed}");

    let drop_button = TextButton::new(width - 220.0, 20.0, 200.0, 60.0, "Drop", BLUE, GREEN, 30);
    let mut wager_field = WagerField::new(width - 220.0, 120.0, 200.0, 40.0, "Wager", &default_wager);
    let mut notice = Notice::default();

    loop {
        use_virtual_resolution(width, height);
        clear_background(BLACK);

        draw_world(game.world(), game.layout());
        draw_hud(game.hud());
        let clicked = drop_button.click();
        if wagering {
            wager_field.draw();
        }

        if notice.is_open() {
            notice.update();
        } else {
            if wagering {
                wager_field.update();
            }
            if clicked || is_key_pressed(KeyCode::Space) {
                game.launch(wagering.then(|| wager_field.text().to_string()));
            }
            for feedback in game.tick() {
                if let Feedback::Rejected(err) = feedback {
                    notice.show(err.to_string());
                }
            }
        }
        notice.draw(width, height);

        next_frame().await;
    }
}
