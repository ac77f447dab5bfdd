//! # Gomoku Q-learning
//!
//! Two tabular Q-learning agents learn Gomoku (five in a row on a square
//! board) by playing against each other. Each color keeps its own table,
//! persisted as JSON between runs.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: board, player, win detection, game state
//! - [`ai`] — Agent trait, Q-table, Q-learning and random agents, state keys
//! - [`training`] — Self-play games, credit assignment, metrics, trainer
//! - [`storage`] — Table persistence and training audit records
//! - [`service`] — Training trigger and move inference behind one lock
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod service;
pub mod storage;
pub mod training;
