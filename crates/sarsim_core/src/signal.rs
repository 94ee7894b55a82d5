//! Decaying signal layer for indirect drone coordination.
//!
//! Each grid cell owns an ordered sequence of [`Signal`] values
//! (insertion order = emission order). Intensity decays exponentially
//! with age and is always recomputed from the original emission tick,
//! so a decay pass is idempotent: running it twice at the same tick
//! yields identical strengths.

use rayon::prelude::*;
use sarsim_data::{Position, Signal, SignalKind};
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Per-tick multiplicative base of the decay curve.
const DECAY_BASE: f32 = 0.9;

/// Grid-aligned store of decaying signals.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SignalField {
    cells: Vec<Vec<Signal>>,
    width: u16,
    height: u16,
    decay_rate: f32,
}

impl SignalField {
    #[must_use]
    pub fn new(width: u16, height: u16, decay_rate: f32) -> Self {
        Self {
            cells: vec![Vec::new(); width as usize * height as usize],
            width,
            height,
            decay_rate,
        }
    }

    #[inline(always)]
    fn index(&self, x: u16, y: u16) -> usize {
        (y as usize * self.width as usize) + x as usize
    }

    fn checked_index(&self, x: u16, y: u16) -> Result<usize> {
        if x < self.width && y < self.height {
            Ok(self.index(x, y))
        } else {
            Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Appends a signal to one cell. No other cell is touched.
    pub fn emit(
        &mut self,
        pos: Position,
        kind: SignalKind,
        message: impl Into<String>,
        tick: u64,
        intensity: f32,
    ) -> Result<()> {
        let idx = self.checked_index(pos.x, pos.y)?;
        self.cells[idx].push(Signal::new(kind, message, tick, intensity));
        Ok(())
    }

    /// Signals currently present at one cell, in emission order.
    pub fn signals_at(&self, x: u16, y: u16) -> Result<&[Signal]> {
        let idx = self.checked_index(x, y)?;
        Ok(&self.cells[idx])
    }

    /// Recomputes every signal's strength from its emission tick and
    /// drops the ones that have fully faded.
    ///
    /// One uniform pass over the whole grid; callers run it exactly once
    /// per tick, after all drones have acted. Rows decay independently,
    /// so the pass parallelizes over row chunks.
    pub fn decay_all(&mut self, current_tick: u64) {
        let rate = self.decay_rate;
        self.cells
            .par_chunks_mut(self.width as usize)
            .for_each(|row| {
                for cell in row {
                    for signal in cell.iter_mut() {
                        let age = signal.age(current_tick) as f32;
                        signal.strength = signal.intensity * DECAY_BASE.powf(age / rate);
                    }
                    cell.retain(|signal| signal.strength > 0.0);
                }
            });
    }

    /// All signals of `kind` within Chebyshev `radius` of `center` whose
    /// age does not exceed `max_age`. Returned by value: signals are
    /// owned by their cells and never aliased.
    pub fn query(
        &self,
        center: Position,
        radius: u16,
        kind: SignalKind,
        max_age: u64,
        current_tick: u64,
    ) -> Result<Vec<Signal>> {
        self.checked_index(center.x, center.y)?;
        let mut found = Vec::new();
        self.for_each_cell_in_radius(center, radius, |signals| {
            for signal in signals {
                if signal.kind == kind && signal.age(current_tick) <= max_age {
                    found.push(signal.clone());
                }
            }
            false
        });
        Ok(found)
    }

    /// True if any signal of `kind` exists within Chebyshev `radius`.
    pub fn has_any_of_kind(&self, center: Position, radius: u16, kind: SignalKind) -> Result<bool> {
        self.checked_index(center.x, center.y)?;
        let mut hit = false;
        self.for_each_cell_in_radius(center, radius, |signals| {
            if signals.iter().any(|s| s.kind == kind) {
                hit = true;
                return true;
            }
            false
        });
        Ok(hit)
    }

    /// Visits every in-bounds cell in the square window; the visitor
    /// returns true to stop early.
    fn for_each_cell_in_radius<F>(&self, center: Position, radius: u16, mut visit: F)
    where
        F: FnMut(&[Signal]) -> bool,
    {
        let r = i32::from(radius);
        for dy in -r..=r {
            for dx in -r..=r {
                if let Some(pos) = center.offset(dx, dy, self.width, self.height) {
                    if visit(&self.cells[self.index(pos.x, pos.y)]) {
                        return;
                    }
                }
            }
        }
    }
}
