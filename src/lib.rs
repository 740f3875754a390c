//! Breakeven Planner — guided break-even wizard core.

pub mod config;
pub mod error;
pub mod finance;
pub mod http;
pub mod llm;
pub mod store;
pub mod suggest;
pub mod view;
pub mod wizard;
