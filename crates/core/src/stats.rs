//! Work-order dashboard counters.

use serde::Serialize;
use time::macros::format_description;
use time::Date;

use crate::schema::WorkOrder;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkOrderStats {
    pub total: usize,
    /// Pending or in progress.
    pub open: usize,
    /// High or critical priority.
    pub urgent: usize,
    /// Due strictly before the reference date, whatever the status.
    pub late: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl WorkOrderStats {
    pub fn compute(orders: &[WorkOrder], today: Date) -> Self {
        let mut stats = WorkOrderStats {
            total: orders.len(),
            ..Default::default()
        };
        for order in orders {
            match normalize(&order.status).as_str() {
                "pending" => stats.pending += 1,
                "in_progress" => stats.in_progress += 1,
                "completed" => stats.completed += 1,
                "cancelled" => stats.cancelled += 1,
                _ => {}
            }
            if matches!(normalize(&order.priority).as_str(), "high" | "critical") {
                stats.urgent += 1;
            }
            if due_date(&order.due_date).is_some_and(|due| due < today) {
                stats.late += 1;
            }
        }
        stats.open = stats.pending + stats.in_progress;
        stats
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_ascii_lowercase().replace('-', "_")
}

// Accepts bare dates and timestamps with a leading `YYYY-MM-DD`.
fn due_date(raw: &str) -> Option<Date> {
    let prefix = raw.get(..10)?;
    Date::parse(prefix, format_description!("[year]-[month]-[day]")).ok()
}
