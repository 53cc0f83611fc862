mod book;
mod patron;

pub use book::*;
pub use patron::*;

/// Loan target of a book nobody has borrowed.
pub const NO_ONE: i32 = -1;

/// Checkout count of a freshly enrolled patron.
pub const NONE: u32 = 0;
