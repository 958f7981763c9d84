//! Selection cursor, clamped to the board.

/// One step of cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Up => (0, -1),
            Self::Down => (0, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
}

impl Cursor {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Move one cell; a step that would leave `[0, width) x [0, height)` is ignored.
    pub fn step(&mut self, direction: Direction, width: usize, height: usize) {
        let (dx, dy) = direction.delta();
        if let Some(x) = self.x.checked_add_signed(dx as isize).filter(|&x| x < width) {
            self.x = x;
        }
        if let Some(y) = self.y.checked_add_signed(dy as isize).filter(|&y| y < height) {
            self.y = y;
        }
    }

    /// Signed coordinates as the field takes them.
    pub fn position(&self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_moves_within_bounds() {
        let mut c = Cursor::new(1, 1);
        c.step(Direction::Right, 4, 3);
        c.step(Direction::Down, 4, 3);
        assert_eq!(c, Cursor::new(2, 2));
        c.step(Direction::Left, 4, 3);
        c.step(Direction::Up, 4, 3);
        assert_eq!(c.position(), (1, 1));
    }

    #[test]
    fn test_step_clamps_at_edges() {
        let mut c = Cursor::default();
        c.step(Direction::Left, 4, 3);
        c.step(Direction::Up, 4, 3);
        assert_eq!(c, Cursor::new(0, 0));

        let mut c = Cursor::new(3, 2);
        c.step(Direction::Right, 4, 3);
        c.step(Direction::Down, 4, 3);
        assert_eq!(c, Cursor::new(3, 2));
    }
}
