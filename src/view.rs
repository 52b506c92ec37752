//! View sync: a pure projection from playlist, transport state and device
//! telemetry to what the UI shows. Rendering lives in `ui`.

mod display;

pub use display::*;

#[cfg(test)]
mod tests;
