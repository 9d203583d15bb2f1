/*
Single-line numeric input for the wager.

Accepts digits and one decimal point; Backspace deletes. Space is left alone
so it can launch balls.
*/

use macroquad::prelude::*;

use crate::modules::scale::mouse_position_virtual;

pub struct WagerField {
    pub rect: Rect,
    pub label: String,
    text: String,
    focused: bool,
    max_len: usize,
}

impl WagerField {
    pub fn new(x: f32, y: f32, width: f32, height: f32, label: &str, initial: &str) -> Self {
        let mut field = Self {
            rect: Rect::new(x, y, width, height),
            label: label.to_string(),
            text: String::new(),
            focused: true,
            max_len: 12,
        };
        for c in initial.chars() {
            field.accept_char(c);
        }
        field
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the character was taken
    pub fn accept_char(&mut self, c: char) -> bool {
        if self.text.len() >= self.max_len {
            return false;
        }
        let ok = c.is_ascii_digit() || (c == '.' && !self.text.contains('.'));
        if ok {
            self.text.push(c);
        }
        ok
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    /// Read this frame's keyboard and mouse input
    pub fn update(&mut self) {
        if is_mouse_button_pressed(MouseButton::Left) {
            self.focused = self.rect.contains(mouse_position_virtual());
        }
        if !self.focused {
            // Drain so keys typed while unfocused do not show up later
            while get_char_pressed().is_some() {}
            return;
        }
        while let Some(c) = get_char_pressed() {
            self.accept_char(c);
        }
        if is_key_pressed(KeyCode::Backspace) {
            self.backspace();
        }
    }

    pub fn draw(&self) {
        draw_text(&self.label, self.rect.x, self.rect.y - 8.0, 22.0, WHITE);
        draw_rectangle(self.rect.x, self.rect.y, self.rect.w, self.rect.h, Color::new(0.1, 0.1, 0.15, 1.0));
        let border = if self.focused { SKYBLUE } else { GRAY };
        draw_rectangle_lines(self.rect.x, self.rect.y, self.rect.w, self.rect.h, 2.0, border);
        draw_text(
            &self.text,
            self.rect.x + 8.0,
            self.rect.y + self.rect.h * 0.7,
            self.rect.h * 0.7,
            WHITE,
        );
    }
}
