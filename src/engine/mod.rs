// src/engine/mod.rs

//! Liveness-decision and restart-orchestration engine.
//!
//! One [`Watchdog::watch`] call performs one pass:
//!
//! ```text
//! evaluate ──► Healthy ──────────────────────────► done
//!     │
//!     └─► Dead/Stale/DependencyChanged/NoMatch
//!             │
//!             ▼
//!         terminate (graceful ► wait ► forceful ► wait)
//!             │
//!             ├─► survivors remain ──► fatal, NO relaunch
//!             │
//!             ▼
//!         launch (detached) ► settle ► verify snapshot
//! ```
//!
//! The pass is strictly sequential — the only suspension points are the
//! three fixed sleeps. The engine is stateless between calls: repeated
//! invocations are idempotent and safe to resume after a crash of the
//! watchdog itself.
//!
//! The decision logic is kept in pure helper functions (see [`evaluate`])
//! so it can be unit tested without Tokio, processes, or a filesystem; the
//! async shell around it only does IO through the collaborator traits.

pub mod core;
pub mod evaluate;
pub mod restart;
pub mod terminate;

pub use self::core::Watchdog;
