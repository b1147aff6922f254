//! Application module: the player controller and its display surfaces.
//!
//! `PlayerController` (in `app::model`) holds the session, the view state
//! written for the UI and the media handle it drives.

mod model;
mod view;
mod watch;

pub use model::*;
pub use view::*;
pub use watch::OnceWatch;

#[cfg(test)]
mod tests;
