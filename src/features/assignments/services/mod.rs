mod assignment_service;

pub use assignment_service::{AssignAttempt, AssignmentService, AutoAssignOutcome};
