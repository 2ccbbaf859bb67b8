//! Collection core: filtering, view cursor, section routing, stats
//!
//! Pure logic over in-memory collections. The API layer loads items from the
//! database and runs these functions; nothing here touches I/O.

pub mod filter;
pub mod router;
pub mod stats;
pub mod view;

pub use filter::{Filterable, Filters, RatingFilter, ViewType};
pub use router::{Mode, Section, SectionRouter};
pub use view::ViewIndex;
