//! Leave and visitor applications against the on-disk student directory.

use chrono::NaiveDate;
use hostel::{
    Config, Decision, Error, LeaveRequest, Ledger, SqliteDirectory, Status, StudentRecord,
    VisitorRequest,
};

#[tokio::test]
async fn leave_records_the_room_held_when_applying() {
    let directory = SqliteDirectory::open_in_memory().unwrap();
    directory
        .upsert_profile(&StudentRecord::new("CS-001", "Asha Rao", "Computer Science"))
        .unwrap();
    let mut ledger = Ledger::load(directory, Config::default().room_catalog().unwrap())
        .await
        .unwrap();
    ledger.assign("A-104", "CS-001").await.unwrap();

    let app = ledger
        .directory()
        .submit_leave(&LeaveRequest::new(
            "CS-001",
            "Sister's wedding",
            "12/12/2024",
            "15/12/2024",
        ))
        .unwrap();
    assert_eq!(app.room.as_deref(), Some("A-104"));

    ledger.remove("A-104", "CS-001").await.unwrap();
    let stored = ledger.directory().leave_application(app.id).unwrap().unwrap();
    assert_eq!(stored.room.as_deref(), Some("A-104"));
    assert_eq!(stored.days(), 4);
}

#[test]
fn decisions_survive_reopen() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("students.db");

    let (leave_id, visitor_id) = {
        let directory = SqliteDirectory::open(&path).unwrap();
        directory
            .upsert_profile(&StudentRecord::new("ME-002", "Ravi Kumar", "Mechanical"))
            .unwrap();
        let leave = directory
            .submit_leave(&LeaveRequest::new("ME-002", "Medical", "01/02/2025", "03/02/2025"))
            .unwrap();
        let visit = directory
            .submit_visitor(&VisitorRequest {
                visitor_name: "Suresh Kumar".to_string(),
                student_id: "ME-002".to_string(),
                relation: "Father".to_string(),
                phone: "98860 55555".to_string(),
                visit_date: NaiveDate::from_ymd_opt(2025, 2, 9).unwrap(),
            })
            .unwrap();
        directory
            .decide_leave(leave.id, Decision::Approve, "warden")
            .unwrap();
        (leave.id, visit.id)
    };

    let directory = SqliteDirectory::open(&path).unwrap();
    let leave = directory.leave_application(leave_id).unwrap().unwrap();
    assert_eq!(leave.status, Status::Approved);
    assert_eq!(leave.processed_by.as_deref(), Some("warden"));

    let pending = directory.visitor_applications(Some(Status::Pending)).unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, visitor_id);

    directory
        .decide_visitor(visitor_id, Decision::Reject, "warden")
        .unwrap();
    let err = directory
        .decide_visitor(visitor_id, Decision::Approve, "warden")
        .unwrap_err();
    assert!(err.is_invalid_request());
}

#[test]
fn blank_profile_name_is_not_saved() {
    let directory = SqliteDirectory::open_in_memory().unwrap();
    let err = directory
        .upsert_profile(&StudentRecord::new("S1", "", ""))
        .unwrap_err();
    assert_eq!(err.to_string(), "name is required");
    assert!(matches!(err, Error::MissingField { field: "name" }));
    assert!(directory.all().unwrap().is_empty());
}
