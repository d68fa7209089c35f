#![forbid(unsafe_code)]

mod identity;
mod stage;
mod view;

pub use identity::{Direction, IdentityEntry, IdentityMapping};
pub use stage::{Stage, StagedView};
pub use view::ViewDocument;
