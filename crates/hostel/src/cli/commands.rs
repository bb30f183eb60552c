//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::application::Status;

/// Room listing arguments.
#[derive(Debug, Args)]
pub struct RoomsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Only show rooms with at least one free bed
    #[arg(long)]
    pub available: bool,
}

/// Room detail arguments.
#[derive(Debug, Args)]
pub struct RoomCommand {
    /// Room identifier (e.g. A-101)
    pub room: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Assign a student to a room.
#[derive(Debug, Args)]
pub struct AssignCommand {
    /// Room identifier
    pub room: String,

    /// Student roll number
    pub student: String,
}

/// Remove a student from a room.
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Room identifier
    pub room: String,

    /// Student roll number
    pub student: String,
}

/// Directory status arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Student directory commands.
#[derive(Debug, Subcommand)]
pub enum StudentCommand {
    /// Add a student, or update name and department of an existing one
    Add {
        /// Roll number
        id: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Department
        #[arg(short, long)]
        department: String,
    },

    /// List students
    List {
        /// Only students without a room
        #[arg(short, long)]
        unassigned: bool,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show one student
    Show {
        /// Roll number
        id: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Application status as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Waiting for a decision
    Pending,
    /// Approved
    Approved,
    /// Rejected
    Rejected,
}

impl From<StatusArg> for Status {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => Self::Pending,
            StatusArg::Approved => Self::Approved,
            StatusArg::Rejected => Self::Rejected,
        }
    }
}

/// Listing arguments shared by leave and visitor applications.
#[derive(Debug, Args)]
pub struct ListApplications {
    /// Only applications in this state (default: pending)
    #[arg(short, long, value_enum, conflicts_with = "all")]
    pub status: Option<StatusArg>,

    /// Show applications in every state
    #[arg(short, long)]
    pub all: bool,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl ListApplications {
    /// The status to filter on, `None` for every application.
    #[must_use]
    pub fn status_filter(&self) -> Option<Status> {
        if self.all {
            None
        } else {
            Some(self.status.map_or(Status::Pending, Status::from))
        }
    }
}

/// Approve or reject one application.
#[derive(Debug, Args)]
pub struct DecideApplication {
    /// Application number
    pub id: i64,

    /// Who is deciding
    #[arg(short, long)]
    pub by: String,
}

/// Leave application commands.
#[derive(Debug, Subcommand)]
pub enum LeaveCommand {
    /// Apply for leave on behalf of a student
    Submit {
        /// Roll number
        student: String,

        /// Reason for leave
        #[arg(short, long)]
        reason: String,

        /// First day away (DD/MM/YYYY)
        #[arg(long)]
        from: String,

        /// Last day away (DD/MM/YYYY)
        #[arg(long)]
        to: String,
    },

    /// List leave applications
    List(ListApplications),

    /// Approve a pending application
    Approve(DecideApplication),

    /// Reject a pending application
    Reject(DecideApplication),
}

/// Visitor application commands.
#[derive(Debug, Subcommand)]
pub enum VisitorCommand {
    /// Request entry for a visitor
    Submit {
        /// Visitor's full name
        #[arg(long)]
        visitor: String,

        /// Roll number of the student being visited
        #[arg(long)]
        student: String,

        /// Relation to the student
        #[arg(short, long)]
        relation: String,

        /// Contact number
        #[arg(short, long)]
        phone: String,

        /// Day of the visit (DD/MM/YYYY, default: today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List visitor applications
    List(ListApplications),

    /// Approve a pending application
    Approve(DecideApplication),

    /// Reject a pending application
    Reject(DecideApplication),
}
