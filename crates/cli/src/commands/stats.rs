use millwright_core::{WorkOrder, WorkOrderStats};
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use super::{mount, print_json, Context};
use crate::OutputFormat;

pub(crate) async fn cmd_stats(ctx: &Context, as_of: Option<&str>) -> Result<(), String> {
    let today = match as_of {
        Some(raw) => Date::parse(raw, format_description!("[year]-[month]-[day]"))
            .map_err(|e| format!("invalid --as-of date '{}': {}", raw, e))?,
        None => OffsetDateTime::now_utc().date(),
    };
    let card = mount::<WorkOrder>(ctx).await?;
    let stats = WorkOrderStats::compute(card.records(), today);

    match ctx.output {
        OutputFormat::Json => print_json(&stats),
        OutputFormat::Text => {
            println!("Work Orders ({})", today);
            println!("==========================");
            println!("  Total:        {}", stats.total);
            println!("  Open:         {}", stats.open);
            println!("  Urgent:       {}", stats.urgent);
            println!("  Late:         {}", stats.late);
            println!();
            println!("  Pending:      {}", stats.pending);
            println!("  In progress:  {}", stats.in_progress);
            println!("  Completed:    {}", stats.completed);
            println!("  Cancelled:    {}", stats.cancelled);
            Ok(())
        }
    }
}
