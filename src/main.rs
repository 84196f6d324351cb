use std::{process::ExitCode, sync::Arc};

use anyhow::{Context, bail};
use chrono::NaiveDate;

use dailyplan::{BlockScheduler, Conflict, HttpPlanningService, TimeBlock, TimeOfDay, appsettings::AppSettings};

const USAGE: &str = "usage: dailyplan <YYYY-MM-DD> <start, e.g. \"9:00 AM\"> [end]";

struct CheckArgs {
    date: NaiveDate,
    block: TimeBlock,
}

fn parse_args(args: &[String]) -> anyhow::Result<CheckArgs> {
    let (date, start, end) = match args {
        [date, start] => (date, start, None),
        [date, start, end] => (date, start, Some(end)),
        _ => bail!(USAGE),
    };

    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("Invalid date {date:?}"))?;
    let start = TimeOfDay::parse_display(start)?;
    let end = end.map(|end| TimeOfDay::parse_display(end)).transpose()?;

    Ok(CheckArgs {
        date,
        block: TimeBlock::new(start, end),
    })
}

/// Line to print and the process status: 0 when free, 1 on conflict.
fn outcome(date: NaiveDate, block: &TimeBlock, conflict: Option<Conflict>) -> (String, u8) {
    match conflict {
        Some(conflict) => {
            let record = conflict.block.to_record();
            let line = format!(
                "Conflict with plan {} \"{}\" ({} - {})",
                conflict.plan_id,
                conflict.habit,
                record.start_time,
                record.end_time.as_deref().unwrap_or("no end")
            );
            (line, 1)
        }
        None => (format!("{} is free on {}", block.start(), date), 0),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let CheckArgs { date, block } = parse_args(&args)?;

    let settings = AppSettings::load().context("Could not load settings")?;
    let service = HttpPlanningService::from_settings(&settings.planning)?;
    log::info!("Using planning service at {}", service.endpoint());

    let scheduler = BlockScheduler::new(Arc::new(service));
    let conflict = scheduler.check_conflict(date, &block).await?;
    let (line, status) = outcome(date, &block, conflict);
    println!("{line}");

    Ok(ExitCode::from(status))
}
