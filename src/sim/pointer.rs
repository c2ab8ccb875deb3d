// pointer.rs - Pointer / touch input state
//
// Written by event handlers, read once per frame.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
    pub active: bool,
}

impl Default for Pointer {
    fn default() -> Self {
        // Parked far off-canvas until the first move
        Self { x: -1000.0, y: -1000.0, active: false }
    }
}

impl Pointer {
    pub fn move_to(&mut self, x: f32, y: f32) {
        if !(x.is_finite() && y.is_finite()) { return; }
        self.x = x;
        self.y = y;
        self.active = true;
    }

    pub fn leave(&mut self) {
        self.active = false;
    }
}
