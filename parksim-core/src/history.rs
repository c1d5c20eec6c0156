//! Fixed-capacity, most-recent-first history buffers for park graphs.

use serde::{Deserialize, Serialize};

/// Weekly samples, newest at index 0.
///
/// Holds exactly `N` entries at all times. [`History::push`] shifts every
/// entry one slot older and drops the oldest. Deserializing a buffer of any
/// other length fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawHistory<T>")]
pub struct History<T, const N: usize> {
    entries: Vec<T>,
}

#[derive(Deserialize)]
struct RawHistory<T> {
    entries: Vec<T>,
}

impl<T, const N: usize> TryFrom<RawHistory<T>> for History<T, N> {
    type Error = String;

    fn try_from(raw: RawHistory<T>) -> Result<Self, Self::Error> {
        if raw.entries.len() != N {
            return Err(format!(
                "history holds {} entries, expected {}",
                raw.entries.len(),
                N
            ));
        }
        Ok(Self {
            entries: raw.entries,
        })
    }
}

impl<T: Copy, const N: usize> History<T, N> {
    /// Buffer filled with `value` (typically an "undefined" marker).
    pub fn filled(value: T) -> Self {
        Self {
            entries: vec![value; N],
        }
    }

    pub fn push(&mut self, value: T) {
        if N == 0 {
            return;
        }
        self.entries.rotate_right(1);
        self.entries[0] = value;
    }

    /// Resets every slot to `value`.
    pub fn fill(&mut self, value: T) {
        self.entries.iter_mut().for_each(|e| *e = value);
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.entries.get(index).copied()
    }

    pub fn latest(&self) -> Option<T> {
        self.get(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn capacity(&self) -> usize {
        N
    }

    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }
}

impl<T: Copy + Default, const N: usize> Default for History<T, N> {
    fn default() -> Self {
        Self::filled(T::default())
    }
}
