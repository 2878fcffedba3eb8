// ABOUTME: Configuration module for the Chart2Fit server
// ABOUTME: Re-exports the environment-based server configuration
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Configuration management. Chart2Fit is configured exclusively through
//! environment variables; there is no configuration file format.

/// Environment-based configuration management
pub mod environment;

pub use environment::ServerConfig;
