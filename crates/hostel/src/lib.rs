//! `hostel` - Room occupancy ledger for a student hostel
//!
//! This library tracks a fixed catalog of rooms and derives which students
//! occupy each one from an external student directory. Assignments and
//! removals are written through the [`Directory`] trait, which keeps the
//! directory the single source of truth.
//!
//! The same directory database also keeps student [`leave`] and [`visitor`]
//! applications, each submitted as pending and approved or rejected once.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod application;
pub mod cli;
pub mod config;
pub mod directory;
pub mod error;
pub mod leave;
pub mod ledger;
pub mod logging;
pub mod occupancy;
pub mod room;
pub mod student;
pub mod visitor;

pub use application::{Decision, Status};
pub use config::Config;
pub use directory::{Directory, InMemoryDirectory, SqliteDirectory};
pub use error::{Error, Result};
pub use leave::{LeaveApplication, LeaveRequest};
pub use ledger::{Ledger, RemoveOutcome};
pub use logging::init_logging;
pub use occupancy::{derive_occupancy, Occupancy, RoomOccupancy, RoomSummary};
pub use room::{Room, RoomCatalog};
pub use student::StudentRecord;
pub use visitor::{VisitorApplication, VisitorRequest};
