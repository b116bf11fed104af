//! Worms: a foraging life simulation. Worms wander a bounded arena, chase
//! the nearest food with a probability set by their IQ, get smarter with
//! every bite (and dumber on poison pills), and retire in a burst of
//! particles once their IQ reaches the transcendence threshold.

pub mod canvas;
pub mod config;
pub mod constants;
pub mod renderer;
pub mod simulation;
