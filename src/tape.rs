//! The bounded memory tape.

/// Number of cells on a tape created with [`Tape::new`].
pub const DEFAULT_CAPACITY: usize = 1000;

/// Raised when a pointer move would leave the tape.
///
/// By the time this is returned the pointer has already been clamped to
/// `clamped`, the nearest valid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("pointer moved to {attempted}, outside 0..{capacity}")]
pub struct OutOfBounds {
    pub attempted: isize,
    pub clamped: usize,
    pub capacity: usize,
}

/// A fixed-capacity row of signed byte cells with a single cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<i8>,
    pointer: usize,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl Tape {
    /// A zeroed tape of [`DEFAULT_CAPACITY`] cells.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A zeroed tape of `capacity` cells. A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: vec![0; capacity.max(1)],
            pointer: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn cells(&self) -> &[i8] {
        &self.cells
    }

    /// Value of the cell under the pointer.
    pub fn current(&self) -> i8 {
        self.cells[self.pointer]
    }

    pub fn is_zero(&self) -> bool {
        self.current() == 0
    }

    /// Move the pointer by `delta` cells.
    ///
    /// Leaving the tape clamps the pointer to the nearest end and reports
    /// [`OutOfBounds`]; the pointer never dangles.
    pub fn shift(&mut self, delta: isize) -> Result<(), OutOfBounds> {
        let capacity = self.capacity();
        match self.pointer.checked_add_signed(delta) {
            Some(next) if next < capacity => {
                self.pointer = next;
                Ok(())
            }
            _ => {
                let attempted = self.pointer as isize + delta;
                self.pointer = if delta < 0 { 0 } else { capacity - 1 };
                Err(OutOfBounds {
                    attempted,
                    clamped: self.pointer,
                    capacity,
                })
            }
        }
    }

    /// Add one to the current cell, wrapping at the 8-bit boundary.
    pub fn increment(&mut self) {
        self.cells[self.pointer] = self.cells[self.pointer].wrapping_add(1);
    }

    /// Subtract one from the current cell, wrapping at the 8-bit boundary.
    pub fn decrement(&mut self) {
        self.cells[self.pointer] = self.cells[self.pointer].wrapping_sub(1);
    }

    /// The current cell as an output byte.
    pub fn read(&self) -> u8 {
        self.current() as u8
    }

    /// Store an input byte in the current cell.
    pub fn write(&mut self, byte: u8) {
        self.cells[self.pointer] = byte as i8;
    }
}
