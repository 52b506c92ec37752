//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the list cursor, the
//! add-files prompt and popup state.

mod model;

pub use model::*;
