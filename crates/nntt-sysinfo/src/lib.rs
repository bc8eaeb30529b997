//! # nntt-sysinfo
//!
//! Reports installed NVIDIA GPUs: driver version, device names, memory
//! usage, temperature, and power state.
//!
//! The probe shells out to the vendor's `nvidia-smi` tool through the
//! [`SmiRunner`] trait, so tests can substitute canned output.  A failed probe
//! is reported through [`NvidiaInfo::state`] rather than as an error: a
//! training script asking "what GPUs do I have?" should get an answer even on
//! a machine without the driver.

pub mod gpu;

pub use gpu::{nvidia_info, GpuDevice, NvidiaInfo, NvidiaSmi, ProbeError, SmiQuery, SmiRunner};
