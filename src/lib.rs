//! Snake Dash - grid snake with difficulty levels, obstacles and hold-to-boost
//!
//! This library provides:
//! - Core game logic, timing and speed control (game module)
//! - High score persistence (score module)
//! - TUI rendering and keyboard input (render, input modules)
//! - The interactive terminal mode (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod score;
