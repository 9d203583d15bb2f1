/*
Virtual resolution: the board is laid out on a fixed 1024x768 canvas and
letterboxed into whatever size the window has.

Call use_virtual_resolution at the top of every frame, before drawing.
Mouse positions from macroquad are in window pixels; run them through
screen_to_virtual before comparing with anything on the board.
*/

use std::cell::Cell;

use macroquad::prelude::*;

/// Scale and top-left offset of the letterboxed canvas inside a window
pub fn letterbox(virtual_w: f32, virtual_h: f32, window_w: f32, window_h: f32) -> (f32, Vec2) {
    let scale = (window_w / virtual_w).min(window_h / virtual_h);
    let offset = vec2(
        (window_w - virtual_w * scale) / 2.0,
        (window_h - virtual_h * scale) / 2.0,
    );
    (scale, offset)
}

/// Window pixel -> canvas coordinate
pub fn window_to_virtual(point: Vec2, virtual_w: f32, virtual_h: f32, window_w: f32, window_h: f32) -> Vec2 {
    let (scale, offset) = letterbox(virtual_w, virtual_h, window_w, window_h);
    (point - offset) / scale
}

thread_local! {
    // Set each frame by use_virtual_resolution
    static RESOLUTION: Cell<(f32, f32)> = const { Cell::new((1024.0, 768.0)) };
}

/// Point the camera at a `width` x `height` canvas, letterboxed and centered
pub fn use_virtual_resolution(width: f32, height: f32) {
    RESOLUTION.with(|r| r.set((width, height)));
    let (scale, offset) = letterbox(width, height, screen_width(), screen_height());
    let mut camera = Camera2D::from_display_rect(Rect::new(0.0, 0.0, width, height));
    camera.viewport = Some((
        offset.x as i32,
        offset.y as i32,
        (width * scale) as i32,
        (height * scale) as i32,
    ));
    set_camera(&camera);
}

/// Window pixel -> canvas coordinate for the resolution set this frame
pub fn screen_to_virtual(point: Vec2) -> Vec2 {
    let (width, height) = RESOLUTION.with(Cell::get);
    window_to_virtual(point, width, height, screen_width(), screen_height())
}

/// Mouse position on the canvas
pub fn mouse_position_virtual() -> Vec2 {
    screen_to_virtual(mouse_position().into())
}
