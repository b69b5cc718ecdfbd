// Machine model
mod cpu;
pub use cpu::{Cpu, PSW_C};
mod memory;
pub use memory::{Memory, CODE_SIZE, RAM_SIZE};

// Running
mod runtime;
pub use runtime::{HaltCause, RunState};

mod error;

pub mod env;
