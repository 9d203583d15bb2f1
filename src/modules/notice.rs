/*
Blocking message box. While open the game does not tick and ignores launch
input; Enter, Escape or a click closes it. The click closes on release, the
same event the Drop button fires on, so it never launches a ball as well.
*/

use macroquad::prelude::*;

#[derive(Default)]
pub struct Notice {
    message: Option<String>,
}

impl Notice {
    pub fn show(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn is_open(&self) -> bool {
        self.message.is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn close(&mut self) {
        self.message = None;
    }

    /// Close on Enter, Escape or a mouse release
    pub fn update(&mut self) {
        let dismiss = is_key_pressed(KeyCode::Enter)
            || is_key_pressed(KeyCode::Escape)
            || is_mouse_button_released(MouseButton::Left);
        self.dismiss_if(dismiss);
    }

    /// Close when `dismiss` is set; true if this closed an open notice
    pub fn dismiss_if(&mut self, dismiss: bool) -> bool {
        if dismiss && self.is_open() {
            self.close();
            return true;
        }
        false
    }

    pub fn draw(&self, width: f32, height: f32) {
        let Some(message) = &self.message else {
            return;
        };
        draw_rectangle(0.0, 0.0, width, height, Color::new(0.0, 0.0, 0.0, 0.6));
        let (w, h) = (520.0, 140.0);
        let (x, y) = ((width - w) / 2.0, (height - h) / 2.0);
        draw_rectangle(x, y, w, h, Color::new(0.15, 0.15, 0.2, 1.0));
        draw_rectangle_lines(x, y, w, h, 2.0, RED);
        draw_text(message, x + 20.0, y + 55.0, 26.0, WHITE);
        draw_text("Press Enter or click to continue", x + 20.0, y + 105.0, 20.0, GRAY);
    }
}
