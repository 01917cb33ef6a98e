//! Waveform engine — functors, synthesis, sampling plans and timers.
//!
//! The pure half (functors, synthesis, evaluation, memo tables) has no
//! runtime requirements and is shared with the WASM bindings. Timers and
//! clocks need the `runtime` feature.

pub mod functor;
pub mod sampler;
pub mod synth;

#[cfg(feature = "runtime")]
pub mod clock;
#[cfg(feature = "runtime")]
pub mod scheduler;
