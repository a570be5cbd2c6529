//! Serials bundled with their tickets and warranty history.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wms_core::error::AppError;
use wms_database::repositories::{TicketRepository, WarrantyHistoryRepository};
use wms_entity::serial::Serial;
use wms_entity::ticket::Ticket;
use wms_entity::warranty::WarrantyHistory;

/// A serial with everything that happened to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialRecord {
    /// The unit.
    #[serde(flatten)]
    pub serial: Serial,
    /// Tickets raised against the unit, newest first.
    pub tickets: Vec<Ticket>,
    /// Warranty service history, newest first.
    pub warranty_history: Vec<WarrantyHistory>,
}

/// Load tickets and warranty history for many serials with two queries.
pub async fn load_records(
    serials: Vec<Serial>,
    ticket_repo: &TicketRepository,
    history_repo: &WarrantyHistoryRepository,
) -> Result<Vec<SerialRecord>, AppError> {
    let ids: Vec<Uuid> = serials.iter().map(|s| s.id).collect();
    let tickets = ticket_repo.find_by_serials(&ids).await?;
    let history = history_repo.find_by_serials(&ids).await?;
    Ok(assemble(serials, tickets, history))
}

fn assemble(
    serials: Vec<Serial>,
    tickets: Vec<Ticket>,
    history: Vec<WarrantyHistory>,
) -> Vec<SerialRecord> {
    let mut tickets_by_serial: HashMap<Uuid, Vec<Ticket>> = HashMap::new();
    for ticket in tickets {
        if let Some(serial_id) = ticket.serial_id {
            tickets_by_serial.entry(serial_id).or_default().push(ticket);
        }
    }

    let mut history_by_serial: HashMap<Uuid, Vec<WarrantyHistory>> = HashMap::new();
    for entry in history {
        history_by_serial.entry(entry.serial_id).or_default().push(entry);
    }

    serials
        .into_iter()
        .map(|serial| SerialRecord {
            tickets: tickets_by_serial.remove(&serial.id).unwrap_or_default(),
            warranty_history: history_by_serial.remove(&serial.id).unwrap_or_default(),
            serial,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use wms_entity::serial::WarrantyStatus;
    use wms_entity::ticket::{TicketPriority, TicketStatus};
    use wms_entity::warranty::WarrantyAction;

    use super::*;

    fn serial(number: &str) -> Serial {
        let now = Utc::now();
        Serial {
            id: Uuid::new_v4(),
            serial_number: number.into(),
            product_id: Uuid::new_v4(),
            contract_id: None,
            manufacture_date: None,
            purchase_date: None,
            warranty_start_date: None,
            warranty_end_date: None,
            warranty_status: WarrantyStatus::Active,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn ticket(serial_id: Option<Uuid>) -> Ticket {
        let now = Utc::now();
        Ticket {
            id: Uuid::new_v4(),
            ticket_number: "TK-20240101-AAAAA".into(),
            serial_id,
            issue_description: "Broken".into(),
            priority: TicketPriority::Medium,
            status: TicketStatus::New,
            customer_name: "C".into(),
            customer_email: None,
            customer_phone: None,
            assigned_to: None,
            created_by: None,
            resolved_at: None,
            closed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn history(serial_id: Uuid) -> WarrantyHistory {
        let now = Utc::now();
        WarrantyHistory {
            id: Uuid::new_v4(),
            serial_id,
            action: WarrantyAction::Repair,
            description: "Fixed".into(),
            cost: None,
            performed_by: None,
            performed_at: now,
            created_at: now,
        }
    }

    #[test]
    fn records_group_by_serial() {
        let a = serial("A");
        let b = serial("B");
        let (a_id, b_id) = (a.id, b.id);

        let records = assemble(
            vec![a, b],
            vec![ticket(Some(a_id)), ticket(Some(a_id)), ticket(None)],
            vec![history(b_id)],
        );

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].serial.id, a_id);
        assert_eq!(records[0].tickets.len(), 2);
        assert!(records[0].warranty_history.is_empty());
        assert_eq!(records[1].warranty_history.len(), 1);
        assert!(records[1].tickets.is_empty());
    }
}
