use super::common::{Common, CommonArgs};
use clap::Parser;
use raceday::Result;

#[derive(Parser, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

pub fn show_status(args: &StatusArgs) -> Result<()> {
    let common = Common::new(&args.common)?;
    let status = common.service.status();

    if !status.ready {
        println!("Index: not built (run `raceday build`)");
        return Ok(());
    }

    println!("Index: ready");
    println!("Dates: {}", status.date_count);
    println!("Races: {}", status.race_count);
    if let Some(built_at) = status.built_at {
        println!("Built: {built_at}");
    }
    if let Some(version) = status.schema_version {
        println!("Schema: v{version}");
    }

    Ok(())
}
