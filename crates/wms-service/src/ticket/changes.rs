//! Turning a ticket edit into the new field values and its history entries.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use wms_core::error::AppError;
use wms_entity::ticket::{
    NewTicketHistory, Ticket, TicketAction, TicketChanges, TicketPriority, TicketStatus,
};

/// Requested edits; `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct TicketPatch {
    /// New problem description.
    pub issue_description: Option<String>,
    /// New priority.
    pub priority: Option<TicketPriority>,
    /// New status.
    pub status: Option<TicketStatus>,
    /// New customer name.
    pub customer_name: Option<String>,
    /// New customer email.
    pub customer_email: Option<String>,
    /// New customer phone.
    pub customer_phone: Option<String>,
    /// New assignee.
    pub assigned_to: Option<Uuid>,
    /// Replaces the generated description of the status entry, or is
    /// recorded as an `updated` entry when the status does not move.
    pub note: Option<String>,
}

/// The outcome of applying a patch to a ticket.
#[derive(Debug, Clone)]
pub struct TicketPlan {
    /// Field values to write back.
    pub changes: TicketChanges,
    /// History entries describing the edit, in order.
    pub history: Vec<NewTicketHistory>,
    /// Set when the assignee changed to this user.
    pub newly_assigned: Option<Uuid>,
}

impl TicketPlan {
    /// Whether the patch changed anything.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

/// Apply `patch` to `current`.
///
/// Status moves are checked against the workflow, stamp `resolved_at` and
/// `closed_at` on entry and clear both when the ticket goes back to an open
/// status. Setting a field to its current value records nothing.
pub fn plan_update(
    current: &Ticket,
    patch: TicketPatch,
    assignee_name: Option<&str>,
    now: DateTime<Utc>,
) -> Result<TicketPlan, AppError> {
    let mut next = current.editable();
    let mut history = Vec::new();
    let mut edited = Vec::new();

    if let Some(description) = patch.issue_description {
        let description = description.trim().to_string();
        if description.is_empty() {
            return Err(AppError::validation("Issue description cannot be empty"));
        }
        if description != next.issue_description {
            next.issue_description = description;
            edited.push("issue description");
        }
    }

    if let Some(name) = patch.customer_name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Customer name cannot be empty"));
        }
        if name != next.customer_name {
            next.customer_name = name;
            edited.push("customer name");
        }
    }

    if let Some(email) = patch.customer_email {
        let email = Some(email.trim().to_lowercase()).filter(|e| !e.is_empty());
        if email != next.customer_email {
            next.customer_email = email;
            edited.push("customer email");
        }
    }

    if let Some(phone) = patch.customer_phone {
        let phone = Some(phone.trim().to_string()).filter(|p| !p.is_empty());
        if phone != next.customer_phone {
            next.customer_phone = phone;
            edited.push("customer phone");
        }
    }

    if let Some(priority) = patch.priority {
        if priority != next.priority {
            history.push(
                NewTicketHistory::new(
                    TicketAction::PriorityChanged,
                    format!("Priority changed from {} to {}", next.priority, priority),
                )
                .with_values(next.priority.as_str(), priority.as_str()),
            );
            next.priority = priority;
        }
    }

    let mut note = patch
        .note
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    if let Some(status) = patch.status {
        if status != current.status {
            current.status.ensure_transition(status)?;
            let description = note.take().unwrap_or_else(|| {
                format!(
                    "Status changed from {} to {}",
                    current.status.label(),
                    status.label()
                )
            });
            history.push(
                NewTicketHistory::new(current.status.transition_action(status), description)
                    .with_values(current.status.as_str(), status.as_str()),
            );
            stamp_status(&mut next, status, now);
        }
    }

    let mut newly_assigned = None;
    if let Some(assignee) = patch.assigned_to {
        if Some(assignee) != current.assigned_to {
            let description = match assignee_name {
                Some(name) => format!("Ticket assigned to {name}"),
                None => "Ticket assigned".to_string(),
            };
            let entry = NewTicketHistory::new(TicketAction::Assigned, description);
            let entry = match current.assigned_to {
                Some(previous) => entry.with_values(previous.to_string(), assignee.to_string()),
                None => NewTicketHistory {
                    new_value: Some(assignee.to_string()),
                    ..entry
                },
            };
            history.push(entry);
            next.assigned_to = Some(assignee);
            newly_assigned = Some(assignee);
        }
    }

    if !edited.is_empty() {
        history.push(NewTicketHistory::new(
            TicketAction::Updated,
            format!("Updated {}", edited.join(", ")),
        ));
    }

    // A note that did not describe a status move is kept as its own entry.
    if let Some(note) = note {
        history.push(NewTicketHistory::new(TicketAction::Updated, note));
    }

    Ok(TicketPlan {
        changes: next,
        history,
        newly_assigned,
    })
}

fn stamp_status(next: &mut TicketChanges, status: TicketStatus, now: DateTime<Utc>) {
    next.status = status;
    match status {
        TicketStatus::Resolved => {
            next.resolved_at = Some(now);
            next.closed_at = None;
        }
        TicketStatus::Closed => {
            next.closed_at = Some(now);
        }
        TicketStatus::New | TicketStatus::Received | TicketStatus::InProgress => {
            next.resolved_at = None;
            next.closed_at = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(status: TicketStatus) -> Ticket {
        let now = Utc::now();
        Ticket {
            id: Uuid::new_v4(),
            ticket_number: "TK-20240101-ABCDE".into(),
            serial_id: None,
            issue_description: "Does not power on".into(),
            priority: TicketPriority::Medium,
            status,
            customer_name: "Ann".into(),
            customer_email: Some("ann@example.com".into()),
            customer_phone: None,
            assigned_to: None,
            created_by: None,
            resolved_at: None,
            closed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn patch_status(status: TicketStatus) -> TicketPatch {
        TicketPatch {
            status: Some(status),
            ..TicketPatch::default()
        }
    }

    #[test]
    fn resolving_stamps_resolved_at() {
        let now = Utc::now();
        let plan = plan_update(
            &ticket(TicketStatus::InProgress),
            patch_status(TicketStatus::Resolved),
            None,
            now,
        )
        .unwrap();
        assert_eq!(plan.changes.status, TicketStatus::Resolved);
        assert_eq!(plan.changes.resolved_at, Some(now));
        assert_eq!(plan.history.len(), 1);
        assert_eq!(plan.history[0].action, TicketAction::Resolved);
        assert_eq!(plan.history[0].old_value.as_deref(), Some("in_progress"));
        assert_eq!(plan.history[0].new_value.as_deref(), Some("resolved"));
    }

    #[test]
    fn reopening_clears_stamps() {
        let mut closed = ticket(TicketStatus::Closed);
        closed.resolved_at = Some(Utc::now());
        closed.closed_at = Some(Utc::now());

        let plan = plan_update(&closed, patch_status(TicketStatus::New), None, Utc::now()).unwrap();
        assert_eq!(plan.history[0].action, TicketAction::Reopened);
        assert!(plan.changes.resolved_at.is_none());
        assert!(plan.changes.closed_at.is_none());
    }

    #[test]
    fn closed_ticket_cannot_jump_to_in_progress() {
        let err = plan_update(
            &ticket(TicketStatus::Closed),
            patch_status(TicketStatus::InProgress),
            None,
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err.kind, wms_core::error::ErrorKind::Validation);
    }

    #[test]
    fn same_status_is_a_no_op() {
        let current = ticket(TicketStatus::Received);
        let plan = plan_update(
            &current,
            patch_status(TicketStatus::Received),
            None,
            Utc::now(),
        )
        .unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.changes, current.editable());
    }

    #[test]
    fn changes_carry_the_version_they_were_planned_from() {
        let current = ticket(TicketStatus::New);
        let plan = plan_update(
            &current,
            patch_status(TicketStatus::Received),
            None,
            Utc::now(),
        )
        .unwrap();
        assert_eq!(plan.changes.base_updated_at, current.updated_at);
    }

    #[test]
    fn note_without_status_change_is_recorded() {
        let plan = plan_update(
            &ticket(TicketStatus::Received),
            TicketPatch {
                status: Some(TicketStatus::Received),
                note: Some("  Customer called for an update ".into()),
                ..TicketPatch::default()
            },
            None,
            Utc::now(),
        )
        .unwrap();
        assert_eq!(plan.history.len(), 1);
        assert_eq!(plan.history[0].action, TicketAction::Updated);
        assert_eq!(plan.history[0].description, "Customer called for an update");
        assert_eq!(plan.changes.status, TicketStatus::Received);
    }

    #[test]
    fn note_replaces_status_description() {
        let plan = plan_update(
            &ticket(TicketStatus::New),
            TicketPatch {
                status: Some(TicketStatus::Received),
                note: Some("Unit arrived at depot".into()),
                ..TicketPatch::default()
            },
            None,
            Utc::now(),
        )
        .unwrap();
        assert_eq!(plan.history[0].action, TicketAction::StatusChanged);
        assert_eq!(plan.history[0].description, "Unit arrived at depot");
    }

    #[test]
    fn each_tracked_change_gets_an_entry() {
        let tech = Uuid::new_v4();
        let plan = plan_update(
            &ticket(TicketStatus::New),
            TicketPatch {
                priority: Some(TicketPriority::Urgent),
                status: Some(TicketStatus::InProgress),
                assigned_to: Some(tech),
                issue_description: Some("Does not power on after storm".into()),
                customer_phone: Some("555-0100".into()),
                ..TicketPatch::default()
            },
            Some("Tom Tech"),
            Utc::now(),
        )
        .unwrap();

        let actions: Vec<TicketAction> = plan.history.iter().map(|h| h.action).collect();
        assert_eq!(
            actions,
            vec![
                TicketAction::PriorityChanged,
                TicketAction::Assigned,
                TicketAction::Assigned,
                TicketAction::Updated,
            ]
        );
        assert_eq!(plan.history[2].description, "Ticket assigned to Tom Tech");
        assert_eq!(
            plan.history[3].description,
            "Updated issue description, customer phone"
        );
        assert_eq!(plan.newly_assigned, Some(tech));
    }

    #[test]
    fn blank_description_is_rejected() {
        let result = plan_update(
            &ticket(TicketStatus::New),
            TicketPatch {
                issue_description: Some("  ".into()),
                ..TicketPatch::default()
            },
            None,
            Utc::now(),
        );
        assert!(result.is_err());
    }
}
