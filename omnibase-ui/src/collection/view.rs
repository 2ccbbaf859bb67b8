//! View-index state machine
//!
//! Pure reducer over the cursor into the filtered collection. Filter changes
//! reset the cursor; saving a rating deliberately advances it instead, so the
//! user lands on the next item rather than jumping back to the first.

use serde::{Deserialize, Serialize};

/// Cursor into the filtered list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewIndex(pub usize);

impl ViewIndex {
    /// Filter or search values changed: back to the first item
    pub fn filters_changed(self) -> ViewIndex {
        ViewIndex(0)
    }

    /// A rating was saved in place: advance to the next item, wrapping
    pub fn rating_saved(self, filtered_len: usize) -> ViewIndex {
        if filtered_len == 0 {
            return ViewIndex(0);
        }
        ViewIndex((self.0 + 1) % filtered_len)
    }

    /// An item was deleted; `filtered_len` is the length after removal.
    /// Empty list resets to 0, an out-of-range cursor clamps to the last
    /// item, anything else is left alone.
    pub fn item_deleted(self, filtered_len: usize) -> ViewIndex {
        if filtered_len == 0 {
            ViewIndex(0)
        } else if self.0 >= filtered_len {
            ViewIndex(filtered_len - 1)
        } else {
            self
        }
    }

    /// Navigate to the next item, wrapping
    pub fn next(self, filtered_len: usize) -> ViewIndex {
        if filtered_len == 0 {
            return ViewIndex(0);
        }
        ViewIndex((self.0 + 1) % filtered_len)
    }

    /// Navigate to the previous item, wrapping
    pub fn prev(self, filtered_len: usize) -> ViewIndex {
        if filtered_len == 0 {
            return ViewIndex(0);
        }
        ViewIndex((self.0 + filtered_len - 1) % filtered_len)
    }
}
