// src/processing/mod.rs
//! Signal processing pipeline for gait recordings

pub mod activation;
pub mod conditioner;
pub mod cycles;
pub mod events;
pub mod filters;
pub mod kinematics;
pub mod pipeline;

pub use activation::*;
pub use cycles::*;
pub use events::*;
pub use filters::*;
pub use kinematics::*;
pub use pipeline::*;
