/*
Clickable rectangle with centered text.

let button = TextButton::new(800.0, 200.0, 200.0, 60.0, "Drop", BLUE, GREEN, 30);
if button.click() { ... }   // draws the button and reports a click this frame
*/

use macroquad::prelude::*;

use crate::modules::scale::mouse_position_virtual;

pub struct TextButton {
    pub rect: Rect,
    pub text: String,
    pub normal_color: Color,
    pub hover_color: Color,
    pub font_size: u16,
}

impl TextButton {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        text: &str,
        normal_color: Color,
        hover_color: Color,
        font_size: u16,
    ) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
            text: text.to_string(),
            normal_color,
            hover_color,
            font_size,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.rect.contains(point)
    }

    /// Draw the button; true when the left mouse button is released over it
    pub fn click(&self) -> bool {
        let hovered = self.contains(mouse_position_virtual());
        let color = if hovered { self.hover_color } else { self.normal_color };
        draw_rectangle(self.rect.x, self.rect.y, self.rect.w, self.rect.h, color);

        let size = measure_text(&self.text, None, self.font_size, 1.0);
        draw_text(
            &self.text,
            self.rect.x + (self.rect.w - size.width) / 2.0,
            self.rect.y + (self.rect.h + size.offset_y) / 2.0,
            self.font_size as f32,
            WHITE,
        );

        hovered && is_mouse_button_released(MouseButton::Left)
    }
}
