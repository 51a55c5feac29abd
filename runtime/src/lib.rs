// Copyright 2026 Stockwatch Contributors
// SPDX-License-Identifier: Apache-2.0

//! Stockwatch runtime library: fetch strategies, the ingestion loop and the
//! HTTP read API around the core [`stockwatch`] cache.
//!
//! This library crate exposes the modules for the binary and for
//! integration testing.

pub mod cli;
pub mod config;
pub mod extract;
pub mod fetcher;
pub mod http_client;
pub mod renderer;
pub mod rest;
pub mod scheduler;
pub mod sink;
pub mod state;
pub mod view;
