//! Simulation core of a vertically scrolling wave shooter.
//!
//! One player, waves of enemies flying in formation and diving, two kinds of
//! enemy shots, pickup items and a score / combo / health economy. The core
//! is a single-threaded tick model driven through [`compute::tick`];
//! rendering, audio and device input live outside it.

pub mod behavior;
pub mod collision;
pub mod compute;
pub mod config;
pub mod deferred;
pub mod entities;
pub mod pool;
pub mod session;
pub mod spawn;
pub mod state;
pub mod vec2;
