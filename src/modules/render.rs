//! Drawing the board, the balls and the HUD.

use macroquad::prelude::*;

use crate::modules::hud::Hud;
use crate::modules::layout::BoardLayout;
use crate::modules::physics::{BodyTag, RapierWorld};

const HUD_FONT: f32 = 24.0;
const LABEL_FONT: f32 = 18.0;

/// Edge slots are red, the center green
fn exit_color(multiplier: f64, max: f64) -> Color {
    let t = if max > 0.0 { (multiplier / max).clamp(0.0, 1.0) as f32 } else { 0.0 };
    Color::new(0.2 + 0.8 * t, 0.8 - 0.6 * t, 0.2, 1.0)
}

fn body_color(tag: Option<BodyTag>, layout: &BoardLayout, max_multiplier: f64) -> Color {
    match tag {
        Some(BodyTag::Ball(_)) => ORANGE,
        Some(BodyTag::Peg(_)) => WHITE,
        Some(BodyTag::Ground) => DARKGRAY,
        Some(BodyTag::Rail(_)) => LIGHTGRAY,
        Some(BodyTag::Exit(i)) => layout
            .exits
            .get(i)
            .map_or(GRAY, |e| exit_color(e.multiplier, max_multiplier)),
        None => GREEN,
    }
}

/// Every body in the world, colored by what it is
pub fn draw_world(world: &RapierWorld, layout: &BoardLayout) {
    let max_multiplier = layout.exits.iter().map(|e| e.multiplier).fold(0.0, f64::max);

    for (_handle, body) in world.bodies().iter() {
        let pos = body.translation();
        let rot = body.rotation().angle();

        for col_handle in body.colliders() {
            let collider = &world.colliders()[*col_handle];
            let color = body_color(BodyTag::from_user_data(collider.user_data), layout, max_multiplier);
            let shape = collider.shape();

            if let Some(ball) = shape.as_ball() {
                draw_circle(pos.x, pos.y, ball.radius, color);
            }

            if let Some(cuboid) = shape.as_cuboid() {
                let hx = cuboid.half_extents.x;
                let hy = cuboid.half_extents.y;
                // Rotate about the body center, rails are tilted
                draw_rectangle_ex(
                    pos.x,
                    pos.y,
                    hx * 2.0,
                    hy * 2.0,
                    DrawRectangleParams {
                        offset: vec2(0.5, 0.5),
                        rotation: rot,
                        color,
                        ..Default::default()
                    },
                );
            }
        }
    }

    // Multiplier printed on each slot
    for exit in &layout.exits {
        let text = format!("x{}", exit.multiplier);
        let size = measure_text(&text, None, LABEL_FONT as u16, 1.0);
        draw_text(
            &text,
            exit.pos.x - size.width / 2.0,
            exit.pos.y + size.offset_y / 2.0,
            LABEL_FONT,
            BLACK,
        );
    }
}

/// Counters under the slots, hits/balance/last result in the corner
pub fn draw_hud(hud: &Hud) {
    let mut y = 30.0;
    for line in [Some(&hud.hits), hud.balance.as_ref(), hud.last.as_ref()].into_iter().flatten() {
        draw_text(line, 20.0, y, HUD_FONT, WHITE);
        y += HUD_FONT + 4.0;
    }

    for label in &hud.exits {
        let mut line_y = label.anchor.y + LABEL_FONT;
        for line in label.text.lines() {
            draw_text(line, label.anchor.x, line_y, LABEL_FONT, WHITE);
            line_y += LABEL_FONT;
        }
    }
}
