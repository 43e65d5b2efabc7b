//! # CXA Rust Backend
//!
//! Multi-tenant survey response analytics and normalization engine.
//!
//! This crate provides a Rust-based backend for the Customer Experience
//! Analytics (CXA) system: it reads raw survey responses collected by the
//! survey platform, normalizes heterogeneous rating scales onto a single
//! ten-point scale, classifies sentiment against configurable thresholds,
//! and assembles cached executive dashboards. The backend exposes a REST
//! API via Axum for the dashboard frontend.
//!
//! ## Features
//!
//! - **Score Normalization**: Map 5-point, 10-point and percentage scales onto one scale
//! - **Classification**: Good/bad sentiment classification with per-request thresholds
//! - **Aggregation**: KPI summaries, daily trend series, low-rating follow-up lists
//! - **Period Handling**: Named and custom reporting windows resolved in local time
//! - **Schema Drift Fallback**: Degraded projection when a tenant store lacks columns
//! - **HTTP API**: RESTful endpoints for frontend integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Identifier and filter types shared across API boundaries
//! - [`db`]: Database operations, repository pattern, and persistence layer
//! - [`models`]: Survey response, threshold and period domain types
//! - [`services`]: Scoring, aggregation, caching, and dashboard assembly
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;
pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
