//! Reusable element handlers.

mod dispatch;
mod list;
mod presence;
mod string;

pub use dispatch::*;
pub use list::*;
pub use presence::*;
pub use string::*;
