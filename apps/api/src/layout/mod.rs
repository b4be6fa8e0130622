// Grid layout core: packing, validation, and reverse mapping for form layouts.
// Pure and synchronous — no I/O, no shared state. Handlers invoke these on
// snapshots of request data and persist only what the validator accepts.

pub mod packer;
pub mod reverse;
pub mod validator;
pub mod width;

// Re-export the public API consumed by the form handlers.
pub use packer::pack;
pub use reverse::unpack;
pub use validator::{validate, LayoutError};
pub use width::{GridCell, Placement, WidthClass, ROW_CAPACITY};
