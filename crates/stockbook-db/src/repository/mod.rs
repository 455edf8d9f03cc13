//! # Repository Module
//!
//! Database repository implementations for Stockbook.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Caller                                                                │
//! │       │                                                                 │
//! │       │  db.movements().summarize(&filter)                             │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  MovementRepository                                                    │
//! │  ├── list(&self, filter, limit)                                        │
//! │  ├── list_page(&self, filter, limit, cursor)                           │
//! │  ├── summarize(&self, filter)                                          │
//! │  └── count(&self, filter)                                              │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  SQL stays isolated here; the write path for movements lives in        │
//! │  [`crate::ledger`], not in a repository.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product catalog operations
//! - [`movement::MovementRepository`] - Read-only movement log queries

pub mod movement;
pub mod product;
