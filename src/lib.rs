//! Lanka Meals - school meal ordering and subsidy platform
//!
//! One axum gateway hosts three logical services:
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────┐
//! │   Auth   │───▶│  Orders  │───▶│ Payments │
//! │ (SLUDI)  │    │ (store)  │    │ (PayDPI) │
//! └──────────┘    └──────────┘    └──────────┘
//! ```
//!
//! - Auth: mock SLUDI login over a seeded user table, issuing HS256 JWTs
//! - Orders: in-memory order store with per-student subsidy pricing and a
//!   one-active-order-per-student-per-day rule
//! - Payments: mock PayDPI gateway whose sessions advance on elapsed time
//!
//! All storage is in-memory; every restart starts from the seeded catalog
//! and student directory.

pub mod auth;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod meals;
pub mod notify;
pub mod orders;
pub mod payments;
pub mod students;

pub use config::AppConfig;
pub use gateway::state::AppState;
