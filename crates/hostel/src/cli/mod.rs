//! Command-line interface for the hostel ledger.
//!
//! This module provides the CLI structure for the `hostelctl` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AssignCommand, ConfigCommand, DecideApplication, LeaveCommand, ListApplications,
    RemoveCommand, RoomCommand, RoomsCommand, StatusArg, StatusCommand, StudentCommand,
    VisitorCommand,
};

/// hostelctl - Manage hostel room assignments
///
/// Lists rooms and their occupants, assigns or removes students, and handles
/// leave and visitor applications. The student directory is the system of
/// record for who sits in which room.
#[derive(Debug, Parser)]
#[command(name = "hostelctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List rooms with bed usage
    Rooms(RoomsCommand),

    /// Show one room and its occupants
    Room(RoomCommand),

    /// Assign a student to a room
    Assign(AssignCommand),

    /// Remove a student from a room
    Remove(RemoveCommand),

    /// Manage student records
    #[command(subcommand)]
    Student(StudentCommand),

    /// Submit, list and decide leave applications
    #[command(subcommand)]
    Leave(LeaveCommand),

    /// Submit, list and decide visitor applications
    #[command(subcommand)]
    Visitor(VisitorCommand),

    /// Show directory status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn status_cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "hostelctl");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_levels() {
        use crate::logging::Verbosity;

        assert_eq!(status_cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(status_cli(3, true).verbosity(), Verbosity::Quiet);
        assert_eq!(status_cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(status_cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(status_cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_assign() {
        let cli = Cli::try_parse_from(["hostelctl", "assign", "A-101", "CS-001"]).unwrap();
        match cli.command {
            Command::Assign(cmd) => {
                assert_eq!(cmd.room, "A-101");
                assert_eq!(cmd.student, "CS-001");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_remove() {
        let cli = Cli::try_parse_from(["hostelctl", "remove", "A-101", "CS-001"]).unwrap();
        assert!(matches!(cli.command, Command::Remove(_)));
    }

    #[test]
    fn test_parse_assign_requires_student() {
        assert!(Cli::try_parse_from(["hostelctl", "assign", "A-101"]).is_err());
    }

    #[test]
    fn test_parse_rooms_json() {
        let cli = Cli::try_parse_from(["hostelctl", "rooms", "--json"]).unwrap();
        assert!(matches!(cli.command, Command::Rooms(RoomsCommand { json: true, .. })));
    }

    #[test]
    fn test_parse_student_add() {
        let cli = Cli::try_parse_from([
            "hostelctl",
            "student",
            "add",
            "ME-014",
            "--name",
            "Kiran Das",
            "--department",
            "Mechanical",
        ])
        .unwrap();
        match cli.command {
            Command::Student(StudentCommand::Add {
                id,
                name,
                department,
            }) => {
                assert_eq!(id, "ME-014");
                assert_eq!(name, "Kiran Das");
                assert_eq!(department, "Mechanical");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["hostelctl", "-c", "/custom/config.toml", "rooms"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose() {
        let cli = Cli::try_parse_from(["hostelctl", "-vv", "status"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
