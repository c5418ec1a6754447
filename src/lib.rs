// Copyright 2026 Rainwatch Contributors
// SPDX-License-Identifier: Apache-2.0

//! Rainwatch library: will-it-rain resolution for Taiwan counties.
//!
//! This library crate exposes the core modules for integration testing.

#![allow(
    dead_code,
    unused_imports,
    clippy::new_without_default,
    clippy::should_implement_trait
)]

pub mod acquisition;
pub mod cli;
pub mod config;
pub mod renderer;
pub mod report;
pub mod resolver;
pub mod rest;
