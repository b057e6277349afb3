use super::common::{Common, CommonArgs};
use clap::Parser;
use raceday::Result;
use raceday::index::BuildReport;

#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Discard any existing index and scan the dataset from scratch
    #[arg(long)]
    pub force: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub fn rebuild_index(args: &BuildArgs) -> Result<()> {
    let common = Common::new(&args.common)?;

    if args.force {
        common.service.invalidate();
    }

    match common.service.rebuild() {
        BuildReport::SkippedInProgress => println!("A build is already in progress; nothing to do"),
        BuildReport::Reloaded { dates, races } => println!("Reused persisted index: {dates} date(s), {races} race(s)"),
        BuildReport::Built { dates, races } => println!("Indexed {dates} date(s) with {races} race(s)"),
    }

    Ok(())
}
