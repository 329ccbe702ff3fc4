// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Option model, rendering rules and declarative resource plan

pub mod access;
pub mod assembler;
pub mod catalog;
pub mod error;
pub mod facts;
pub mod host;
pub mod main_config;
pub mod manifest;
pub mod option;
pub mod renderer;
pub mod resource;
pub mod sensitive;
