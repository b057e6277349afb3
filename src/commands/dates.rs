use super::common::{Common, CommonArgs};
use clap::Parser;
use raceday::Result;

#[derive(Parser, Debug)]
pub struct DatesArgs {
    /// Show at most this many dates
    #[arg(long, value_name = "COUNT")]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub fn list_dates(args: &DatesArgs) -> Result<()> {
    let common = Common::new(&args.common)?;
    let dates = common.service.available_dates();

    if dates.is_empty() {
        println!("No dates indexed; run `raceday build` first");
        return Ok(());
    }

    let limit = args.limit.unwrap_or(dates.len());
    for date in dates.iter().take(limit) {
        println!("{date}");
    }

    Ok(())
}
