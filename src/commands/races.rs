use super::common::{Common, CommonArgs};
use clap::Parser;
use core::fmt::Write;
use raceday::Result;
use raceday::index::RaceIndexEntry;

#[derive(Parser, Debug)]
pub struct RacesArgs {
    /// Date to list, in YYYY-MM-DD form
    #[arg(value_name = "DATE")]
    pub date: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub fn show_races(args: &RacesArgs) -> Result<()> {
    let common = Common::new(&args.common)?;

    let Some(day) = common.service.races_for_date(&args.date) else {
        println!("No races indexed for {}", args.date);
        return Ok(());
    };

    println!("{} ({})", day.display_date, day.date);
    for track in &day.tracks {
        println!();
        println!("{}", track.track);
        for race in &track.races {
            println!("{}", race_line(race));
        }
    }

    Ok(())
}

fn race_line(race: &RaceIndexEntry) -> String {
    let mut line = String::new();
    let _ = write!(line, "  {:>2}R {}", race.race_number, race.race_name);

    if !race.class_name.is_empty() {
        let _ = write!(line, " [{}]", race.class_name);
    }
    if !race.distance.is_empty() {
        let _ = write!(line, " {}", race.distance);
    }
    if !race.start_time.is_empty() {
        let _ = write!(line, " {}", race.start_time);
    }
    if let (Some(rpci), Some(pace_type)) = (race.rpci, race.pace_type) {
        let _ = write!(line, "  rpci {rpci} ({pace_type})");
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use raceday::index::{PaceFigures, PaceType};

    fn entry() -> RaceIndexEntry {
        RaceIndexEntry {
            id: "202501050611".to_string(),
            race_number: 11,
            race_name: "日経新春杯".to_string(),
            class_name: "G2".to_string(),
            distance: "芝2200m".to_string(),
            start_time: "15:35".to_string(),
            kai: Some(1),
            nichi: Some(5),
            pace_type: None,
            winner_first3f: None,
            winner_last3f: None,
            pace_diff: None,
            rpci: None,
        }
    }

    #[test]
    fn test_race_line_without_pace() {
        assert_eq!(race_line(&entry()), "  11R 日経新春杯 [G2] 芝2200m 15:35");
    }

    #[test]
    fn test_race_line_with_pace() {
        let mut race = entry();
        race.set_pace(PaceFigures {
            pace_type: PaceType::Sprint,
            winner_first3f: 35.0,
            winner_last3f: 33.0,
            pace_diff: 2.0,
            rpci: 53.0,
        });

        assert_eq!(race_line(&race), "  11R 日経新春杯 [G2] 芝2200m 15:35  rpci 53 (sprint)");
    }

    #[test]
    fn test_race_line_minimal() {
        let mut race = entry();
        race.class_name = String::new();
        race.distance = String::new();
        race.start_time = String::new();
        race.race_number = 1;

        assert_eq!(race_line(&race), "   1R 日経新春杯");
    }
}
