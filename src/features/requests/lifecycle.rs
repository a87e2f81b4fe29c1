//! Request status state machine.
//!
//! ```text
//! pending --assign--> assigned --accept--> in_progress --complete--> completed
//!    ^                   |
//!    +------reject-------+
//! any non-terminal --cancel--> cancelled
//! ```
//!
//! `completed` and `cancelled` are terminal for every action.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::core::error::AppError;
use crate::features::requests::models::RequestStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestAction {
    Assign,
    Accept,
    Reject,
    Complete,
    Cancel,
}

impl std::fmt::Display for RequestAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestAction::Assign => write!(f, "assign"),
            RequestAction::Accept => write!(f, "accept"),
            RequestAction::Reject => write!(f, "reject"),
            RequestAction::Complete => write!(f, "complete"),
            RequestAction::Cancel => write!(f, "cancel"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Request is {0} and can no longer change")]
    Terminal(RequestStatus),

    #[error("Cannot {action} a request that is {from}")]
    NotAllowed {
        action: RequestAction,
        from: RequestStatus,
    },
}

impl From<TransitionError> for AppError {
    fn from(e: TransitionError) -> Self {
        AppError::Conflict(e.to_string())
    }
}

impl RequestStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Cancelled)
    }

    /// Assigned and in-progress requests count against a mechanic's capacity
    pub fn is_active(self) -> bool {
        matches!(self, RequestStatus::Assigned | RequestStatus::InProgress)
    }

    /// Status reached by applying `action`, or why it is not allowed
    pub fn transition(self, action: RequestAction) -> Result<RequestStatus, TransitionError> {
        if self.is_terminal() {
            return Err(TransitionError::Terminal(self));
        }

        let next = match (action, self) {
            (RequestAction::Assign, RequestStatus::Pending) => RequestStatus::Assigned,
            (RequestAction::Accept, RequestStatus::Assigned) => RequestStatus::InProgress,
            (RequestAction::Reject, RequestStatus::Assigned | RequestStatus::Pending) => {
                RequestStatus::Pending
            }
            (RequestAction::Complete, RequestStatus::InProgress) => RequestStatus::Completed,
            (RequestAction::Cancel, _) => RequestStatus::Cancelled,
            (action, from) => return Err(TransitionError::NotAllowed { action, from }),
        };

        Ok(next)
    }
}

/// Row changes an action makes on top of the status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionEffects {
    pub status: RequestStatus,
    /// Timestamp columns stamped with `NOW()`
    pub stamp: &'static [&'static str],
    /// Columns reset to `NULL`
    pub clear: &'static [&'static str],
    /// New `is_available` for the request's mechanic, if it changes
    pub mechanic_available: Option<bool>,
}

impl ActionEffects {
    /// `SET` list for the `service_requests` update
    pub fn set_clause(&self) -> String {
        let mut columns = vec![format!("status = '{}'", self.status)];
        columns.extend(self.stamp.iter().map(|c| format!("{c} = NOW()")));
        columns.extend(self.clear.iter().map(|c| format!("{c} = NULL")));
        columns.push("updated_at = NOW()".to_string());
        columns.join(", ")
    }
}

impl RequestAction {
    /// Effects of applying this action to a request currently in `from`
    pub fn effects(self, from: RequestStatus) -> Result<ActionEffects, TransitionError> {
        let status = from.transition(self)?;

        let effects = match self {
            RequestAction::Assign => ActionEffects {
                status,
                stamp: &["assigned_at"],
                clear: &[],
                mechanic_available: None,
            },
            RequestAction::Accept => ActionEffects {
                status,
                stamp: &["started_at"],
                clear: &[],
                mechanic_available: Some(false),
            },
            RequestAction::Reject => ActionEffects {
                status,
                stamp: &[],
                clear: &["mechanic_id", "assigned_at"],
                mechanic_available: None,
            },
            RequestAction::Complete => ActionEffects {
                status,
                stamp: &["completed_at"],
                clear: &[],
                mechanic_available: Some(true),
            },
            RequestAction::Cancel => ActionEffects {
                status,
                stamp: &["cancelled_at"],
                clear: &[],
                mechanic_available: (from == RequestStatus::InProgress).then_some(true),
            },
        };

        Ok(effects)
    }

    /// Action that moves a request into `target`, used by the generic status endpoint
    pub fn for_target(target: RequestStatus) -> RequestAction {
        match target {
            RequestStatus::Pending => RequestAction::Reject,
            RequestStatus::Assigned => RequestAction::Assign,
            RequestStatus::InProgress => RequestAction::Accept,
            RequestStatus::Completed => RequestAction::Complete,
            RequestStatus::Cancelled => RequestAction::Cancel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [RequestStatus; 5] = [
        RequestStatus::Pending,
        RequestStatus::Assigned,
        RequestStatus::InProgress,
        RequestStatus::Completed,
        RequestStatus::Cancelled,
    ];

    const ALL_ACTIONS: [RequestAction; 5] = [
        RequestAction::Assign,
        RequestAction::Accept,
        RequestAction::Reject,
        RequestAction::Complete,
        RequestAction::Cancel,
    ];

    #[test]
    fn test_happy_path() {
        let status = RequestStatus::Pending;
        let status = status.transition(RequestAction::Assign).unwrap();
        assert_eq!(status, RequestStatus::Assigned);
        let status = status.transition(RequestAction::Accept).unwrap();
        assert_eq!(status, RequestStatus::InProgress);
        let status = status.transition(RequestAction::Complete).unwrap();
        assert_eq!(status, RequestStatus::Completed);
    }

    #[test]
    fn test_reject_returns_to_pending() {
        assert_eq!(
            RequestStatus::Assigned.transition(RequestAction::Reject),
            Ok(RequestStatus::Pending)
        );
        assert_eq!(
            RequestStatus::Pending.transition(RequestAction::Reject),
            Ok(RequestStatus::Pending)
        );
        assert!(RequestStatus::InProgress
            .transition(RequestAction::Reject)
            .is_err());
    }

    #[test]
    fn test_cancel_from_any_non_terminal_state() {
        for status in ALL_STATUSES.into_iter().filter(|s| !s.is_terminal()) {
            assert_eq!(
                status.transition(RequestAction::Cancel),
                Ok(RequestStatus::Cancelled)
            );
        }
    }

    #[test]
    fn test_terminal_states_reject_every_action() {
        for status in [RequestStatus::Completed, RequestStatus::Cancelled] {
            for action in ALL_ACTIONS {
                assert_eq!(
                    status.transition(action),
                    Err(TransitionError::Terminal(status)),
                    "{action} from {status}"
                );
            }
        }
    }

    #[test]
    fn test_skipping_steps_is_not_allowed() {
        assert_eq!(
            RequestStatus::Pending.transition(RequestAction::Complete),
            Err(TransitionError::NotAllowed {
                action: RequestAction::Complete,
                from: RequestStatus::Pending,
            })
        );
        assert!(RequestStatus::Pending
            .transition(RequestAction::Accept)
            .is_err());
        assert!(RequestStatus::Assigned
            .transition(RequestAction::Assign)
            .is_err());
    }

    #[test]
    fn test_for_target_round_trips_through_transition() {
        let cases = [
            (RequestStatus::Pending, RequestStatus::Assigned),
            (RequestStatus::Assigned, RequestStatus::InProgress),
            (RequestStatus::Assigned, RequestStatus::Pending),
            (RequestStatus::InProgress, RequestStatus::Completed),
            (RequestStatus::InProgress, RequestStatus::Cancelled),
        ];
        for (from, target) in cases {
            let action = RequestAction::for_target(target);
            assert_eq!(from.transition(action), Ok(target));
        }
    }

    #[test]
    fn test_reject_clears_assignment() {
        let effects = RequestAction::Reject
            .effects(RequestStatus::Assigned)
            .unwrap();
        assert_eq!(effects.status, RequestStatus::Pending);
        assert_eq!(effects.clear, &["mechanic_id", "assigned_at"]);
        assert_eq!(effects.mechanic_available, None);
        assert_eq!(
            effects.set_clause(),
            "status = 'pending', mechanic_id = NULL, assigned_at = NULL, updated_at = NOW()"
        );
    }

    #[test]
    fn test_complete_stamps_and_frees_mechanic() {
        let effects = RequestAction::Complete
            .effects(RequestStatus::InProgress)
            .unwrap();
        assert_eq!(effects.status, RequestStatus::Completed);
        assert_eq!(effects.mechanic_available, Some(true));
        assert_eq!(
            effects.set_clause(),
            "status = 'completed', completed_at = NOW(), updated_at = NOW()"
        );
    }

    #[test]
    fn test_accept_takes_mechanic_off_duty() {
        let effects = RequestAction::Accept
            .effects(RequestStatus::Assigned)
            .unwrap();
        assert_eq!(effects.status, RequestStatus::InProgress);
        assert_eq!(effects.stamp, &["started_at"]);
        assert_eq!(effects.mechanic_available, Some(false));
    }

    #[test]
    fn test_cancel_frees_mechanic_only_when_in_progress() {
        let in_progress = RequestAction::Cancel
            .effects(RequestStatus::InProgress)
            .unwrap();
        assert_eq!(in_progress.mechanic_available, Some(true));
        assert!(in_progress.set_clause().contains("cancelled_at = NOW()"));

        let assigned = RequestAction::Cancel
            .effects(RequestStatus::Assigned)
            .unwrap();
        assert_eq!(assigned.mechanic_available, None);
    }

    #[test]
    fn test_effects_refuse_terminal_requests() {
        assert_eq!(
            RequestAction::Reject.effects(RequestStatus::Completed),
            Err(TransitionError::Terminal(RequestStatus::Completed))
        );
    }

    #[test]
    fn test_assign_stamps_assigned_at() {
        let effects = RequestAction::Assign
            .effects(RequestStatus::Pending)
            .unwrap();
        assert_eq!(
            effects.set_clause(),
            "status = 'assigned', assigned_at = NOW(), updated_at = NOW()"
        );
    }

    #[test]
    fn test_active_statuses() {
        let active: Vec<_> = ALL_STATUSES.into_iter().filter(|s| s.is_active()).collect();
        assert_eq!(active, vec![RequestStatus::Assigned, RequestStatus::InProgress]);
    }

    #[test]
    fn test_transition_error_maps_to_conflict() {
        let err: AppError = TransitionError::Terminal(RequestStatus::Completed).into();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
