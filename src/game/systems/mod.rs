pub mod arena;
pub mod collision;
pub mod spawn;
pub mod steering;

/// Clock readings shared by the systems during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    /// Battle clock (ms), advanced every tick including the countdown
    pub now_ms: f64,
    /// Time since the round began (ms)
    pub elapsed_ms: f64,
    /// Clamped frame step (seconds)
    pub dt: f32,
}
