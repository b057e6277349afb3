use super::common::{Common, CommonArgs};
use clap::Parser;
use raceday::Result;

#[derive(Parser, Debug)]
pub struct ClearArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

pub fn clear_index(args: &ClearArgs) -> Result<()> {
    let common = Common::new(&args.common)?;
    common.service.invalidate();
    println!("Index cleared");
    Ok(())
}
