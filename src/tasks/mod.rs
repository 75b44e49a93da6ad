//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Rate-limit sweep: Drops request-count windows that have already reset

mod sweep;

pub use sweep::spawn_limiter_sweep_task;
