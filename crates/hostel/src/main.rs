//! `hostelctl` - CLI for the hostel room ledger
//!
//! This binary lists rooms, shows occupants, assigns or removes students, and
//! handles leave and visitor applications against the local student directory.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use hostel::application::{format_date, parse_date};
use hostel::cli::{
    Cli, Command, ConfigCommand, LeaveCommand, RoomCommand, RoomsCommand, StudentCommand,
    VisitorCommand,
};
use hostel::{
    init_logging, Config, Decision, LeaveApplication, LeaveRequest, Ledger, RemoveOutcome, SqliteDirectory,
    StudentRecord, VisitorApplication, VisitorRequest,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;
    debug!(database = %config.database_path().display(), "configuration loaded");

    match cli.command {
        Command::Rooms(cmd) => handle_rooms(&config, &cmd).await,
        Command::Room(cmd) => handle_room(&config, &cmd).await,
        Command::Assign(cmd) => {
            let mut ledger = open_ledger(&config).await?;
            ledger.assign(&cmd.room, &cmd.student).await?;
            println!("Student {} added to room {}", cmd.student.trim(), cmd.room);
            Ok(())
        }
        Command::Remove(cmd) => {
            let mut ledger = open_ledger(&config).await?;
            match ledger.remove(&cmd.room, &cmd.student).await? {
                RemoveOutcome::Removed => {
                    println!("Student {} removed from room {}", cmd.student.trim(), cmd.room);
                }
                RemoveOutcome::NotInRoom => {
                    println!(
                        "Student {} is not in room {}; nothing to remove",
                        cmd.student.trim(),
                        cmd.room
                    );
                }
            }
            Ok(())
        }
        Command::Student(cmd) => handle_student(&config, cmd),
        Command::Leave(cmd) => handle_leave(&config, &cmd),
        Command::Visitor(cmd) => handle_visitor(&config, &cmd),
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_directory(config: &Config) -> anyhow::Result<SqliteDirectory> {
    let path = config.database_path();
    SqliteDirectory::open(&path)
        .with_context(|| format!("opening student directory at {}", path.display()))
}

async fn open_ledger(config: &Config) -> anyhow::Result<Ledger<SqliteDirectory>> {
    let catalog = config.room_catalog()?;
    let ledger = Ledger::load(open_directory(config)?, catalog)
        .await?
        .with_capacity_enforcement(config.assignment.enforce_capacity);
    Ok(ledger)
}

async fn handle_rooms(config: &Config, cmd: &RoomsCommand) -> anyhow::Result<()> {
    let ledger = open_ledger(config).await?;
    let rooms: Vec<_> = ledger
        .occupancy()
        .rooms()
        .iter()
        .filter(|r| !cmd.available || !r.summary().is_full)
        .collect();

    if cmd.json {
        let out: Vec<_> = rooms
            .iter()
            .map(|r| {
                let s = r.summary();
                serde_json::json!({
                    "room": r.room.id,
                    "capacity": s.capacity,
                    "occupied": s.occupied,
                    "occupancy_percent": s.occupancy_percent,
                    "is_full": s.is_full,
                    "occupants": r.occupants,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{:<10} {:>7}  {}", "Room", "Beds", "Status");
    println!("{:<10} {:>7}  {}", "----", "----", "------");
    for r in rooms {
        let s = r.summary();
        let status = if s.is_full { "full" } else { "available" };
        println!(
            "{:<10} {:>7}  {status}",
            r.room.id,
            format!("{}/{}", s.occupied, s.capacity)
        );
    }
    Ok(())
}

async fn handle_room(config: &Config, cmd: &RoomCommand) -> anyhow::Result<()> {
    let ledger = open_ledger(config).await?;
    let summary = ledger
        .summary(&cmd.room)
        .ok_or_else(|| hostel::Error::room_not_found(&cmd.room))?;
    let occupants = ledger.occupant_records(&cmd.room).unwrap_or_default();

    if cmd.json {
        let out = serde_json::json!({
            "room": cmd.room,
            "summary": summary,
            "students": occupants,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Room {}", cmd.room);
    println!("---------------");
    println!("Total beds:    {}", summary.capacity);
    println!(
        "Occupied:      {} ({}%)",
        summary.occupied, summary.occupancy_percent
    );
    println!();
    if occupants.is_empty() {
        println!("No students assigned.");
    } else {
        println!("Current students:");
        for student in occupants {
            println!(
                "  {:<12} {:<24} {}",
                student.id, student.name, student.department
            );
        }
    }
    Ok(())
}

fn handle_student(config: &Config, cmd: StudentCommand) -> anyhow::Result<()> {
    let directory = open_directory(config)?;
    match cmd {
        StudentCommand::Add {
            id,
            name,
            department,
        } => {
            let student = StudentRecord::new(id, name, department).validated()?;
            directory.upsert_profile(&student)?;
            println!("Saved student {}", student.id);
        }
        StudentCommand::List { unassigned, json } => {
            let students: Vec<StudentRecord> = directory
                .all()?
                .into_iter()
                .filter(|s| !unassigned || !s.is_assigned())
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&students)?);
            } else {
                for s in &students {
                    println!(
                        "{:<12} {:<24} {:<20} {}",
                        s.id,
                        s.name,
                        s.department,
                        s.room.as_deref().unwrap_or("-")
                    );
                }
            }
        }
        StudentCommand::Show { id, json } => {
            let student = directory
                .get(id.trim())?
                .ok_or_else(|| hostel::Error::student_not_found(id.trim()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&student)?);
            } else {
                println!("Roll number:   {}", student.id);
                println!("Name:          {}", student.name);
                println!("Department:    {}", student.department);
                println!("Room:          {}", student.room.as_deref().unwrap_or("N/A"));
                if let Some(at) = directory.room_updated_at(&student.id)? {
                    println!("Room changed:  {}", at.to_rfc3339());
                }
            }
        }
    }
    Ok(())
}

fn handle_leave(config: &Config, cmd: &LeaveCommand) -> anyhow::Result<()> {
    let directory = open_directory(config)?;
    match cmd {
        LeaveCommand::Submit {
            student,
            reason,
            from,
            to,
        } => {
            let app = directory.submit_leave(&LeaveRequest::new(
                student.as_str(),
                reason.as_str(),
                from.as_str(),
                to.as_str(),
            ))?;
            println!(
                "Leave application {} submitted for {} ({})",
                app.id,
                app.student_id,
                app.period()
            );
        }
        LeaveCommand::List(list) => {
            let apps = directory.leave_applications(list.status_filter())?;
            if list.json {
                println!("{}", serde_json::to_string_pretty(&apps)?);
            } else if apps.is_empty() {
                println!("No leave applications.");
            } else {
                print_leave_table(&apps);
            }
        }
        LeaveCommand::Approve(args) => {
            let app = directory.decide_leave(args.id, Decision::Approve, &args.by)?;
            println!("Leave application {} {}", app.id, app.status);
        }
        LeaveCommand::Reject(args) => {
            let app = directory.decide_leave(args.id, Decision::Reject, &args.by)?;
            println!("Leave application {} {}", app.id, app.status);
        }
    }
    Ok(())
}

fn print_leave_table(apps: &[LeaveApplication]) {
    println!(
        "{:>5}  {:<12} {:<20} {:<25} {:<9} {}",
        "No.", "Student", "Name", "Period", "Status", "Reason"
    );
    for app in apps {
        println!(
            "{:>5}  {:<12} {:<20} {:<25} {:<9} {}",
            app.id,
            app.student_id,
            app.student_name,
            app.period(),
            app.status,
            app.reason
        );
    }
}

fn handle_visitor(config: &Config, cmd: &VisitorCommand) -> anyhow::Result<()> {
    let directory = open_directory(config)?;
    match cmd {
        VisitorCommand::Submit {
            visitor,
            student,
            relation,
            phone,
            date,
        } => {
            let visit_date = match date {
                Some(raw) => parse_date("visit_date", raw)?,
                None => chrono::Utc::now().date_naive(),
            };
            let app = directory.submit_visitor(&VisitorRequest {
                visitor_name: visitor.clone(),
                student_id: student.clone(),
                relation: relation.clone(),
                phone: phone.clone(),
                visit_date,
            })?;
            println!(
                "Visitor application {} submitted for {} on {}",
                app.id,
                app.visitor_name,
                format_date(app.visit_date)
            );
        }
        VisitorCommand::List(list) => {
            let apps = directory.visitor_applications(list.status_filter())?;
            if list.json {
                println!("{}", serde_json::to_string_pretty(&apps)?);
            } else if apps.is_empty() {
                println!("No visitor applications.");
            } else {
                print_visitor_table(&apps);
            }
        }
        VisitorCommand::Approve(args) => {
            let app = directory.decide_visitor(args.id, Decision::Approve, &args.by)?;
            println!("Visitor application {} {}", app.id, app.status);
        }
        VisitorCommand::Reject(args) => {
            let app = directory.decide_visitor(args.id, Decision::Reject, &args.by)?;
            println!("Visitor application {} {}", app.id, app.status);
        }
    }
    Ok(())
}

fn print_visitor_table(apps: &[VisitorApplication]) {
    println!(
        "{:>5}  {:<20} {:<12} {:<10} {:<10} {:<9} {}",
        "No.", "Visitor", "Student", "Relation", "Date", "Status", "Phone"
    );
    for app in apps {
        println!(
            "{:>5}  {:<20} {:<12} {:<10} {:<10} {:<9} {}",
            app.id,
            app.visitor_name,
            app.student_id,
            app.relation,
            format_date(app.visit_date),
            app.status,
            app.phone
        );
    }
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let directory = open_directory(config)?;
    let stats = directory.stats()?;
    let catalog = config.room_catalog()?;

    if json {
        let status = serde_json::json!({
            "database_path": config.database_path(),
            "rooms": catalog.len(),
            "beds": catalog.total_beds(),
            "students": stats.total_students,
            "assigned_students": stats.assigned_students,
            "last_room_change": stats.last_room_change,
            "db_size_bytes": stats.db_size_bytes,
            "enforce_capacity": config.assignment.enforce_capacity,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("hostelctl status");
        println!("----------------");
        println!("Database:      {}", config.database_path().display());
        println!("Rooms:         {} ({} beds)", catalog.len(), catalog.total_beds());
        println!(
            "Students:      {} ({} assigned)",
            stats.total_students, stats.assigned_students
        );
        if let Some(at) = stats.last_room_change {
            println!("Last change:   {}", at.to_rfc3339());
        }
        println!("Capacity:      {}", if config.assignment.enforce_capacity {
            "enforced"
        } else {
            "advisory"
        });
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Catalog]");
                println!("  Block:              {}", config.catalog.block);
                println!("  First room number:  {}", config.catalog.first_number);
                println!("  Rooms:              {}", config.catalog.room_count);
                println!("  Beds per room:      {}", config.catalog.beds_per_room);
                println!();
                println!("[Assignment]");
                println!(
                    "  Enforce capacity:   {}",
                    config.assignment.enforce_capacity
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
