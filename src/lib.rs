//! Taskflow: task board state and workflow engine.
//!
//! This crate provides the in-memory model behind a Kanban task board: it
//! reconciles a remote task collection into a three-column board, applies
//! compound filters, and drives create, edit, delete, and status-transition
//! workflows against a remote record store.
//!
//! # Architecture
//!
//! Taskflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure board entities and derived values
//! - **Ports**: Abstract trait interfaces for the record store and notifications
//! - **Adapters**: Concrete implementations of ports (in-memory store, tracing)
//! - **Services**: Normalization, registries, and the workflow controller
//!
//! # Modules
//!
//! - [`board`]: Tasks, projects, tags, filtering, and the workflow controller
//! - [`config`]: Board configuration loaded from TOML
//! - [`telemetry`]: Tracing subscriber installation

pub mod board;
pub mod config;
pub mod telemetry;
