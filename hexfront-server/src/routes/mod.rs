//! HTTP route handlers

pub mod actions;
pub mod board;
pub mod catalog;
pub mod game;
pub mod status;
pub mod turn;
