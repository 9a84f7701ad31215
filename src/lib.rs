// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Expense Server - Personal Expense Tracking API
//!
//! Users record expenses and read per-category reports. Every business
//! endpoint sits behind stateless HS256 bearer-token authentication.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and router (Axum)
//! - `auth` - Token codec, authentication gate, login and registration
//! - `config` - Environment configuration
//! - `store` - In-memory users and expenses

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
