//! Trade log files on disk.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use dualtrend_core::TextTradeLog;

/// Text trade log writing to two buffered files.
pub type FileTradeLog = TextTradeLog<BufWriter<File>>;

/// Where the two logs of a run were written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeLogPaths {
    pub long: PathBuf,
    pub short: PathBuf,
}

/// Create (truncating) the long and short log files under `dir`.
pub fn create_file_logs(
    dir: &Path,
    long_name: &str,
    short_name: &str,
) -> io::Result<(FileTradeLog, TradeLogPaths)> {
    std::fs::create_dir_all(dir)?;
    let paths = TradeLogPaths {
        long: dir.join(long_name),
        short: dir.join(short_name),
    };
    let long = BufWriter::new(File::create(&paths.long)?);
    let short = BufWriter::new(File::create(&paths.short)?);
    Ok((TextTradeLog::new(long, short), paths))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dualtrend_core::{Direction, TradeEvent, TradeEventKind, TradeLogSink};

    #[test]
    fn writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        let (mut log, paths) = create_file_logs(&out, "long.txt", "short.txt").unwrap();

        let date = NaiveDate::from_ymd_opt(2017, 3, 1).unwrap();
        log.begin_day(date).unwrap();
        log.record(&TradeEvent {
            date,
            symbol: "AAPL".into(),
            direction: Direction::Short,
            price: 139.79,
            kind: TradeEventKind::Open,
        })
        .unwrap();
        log.finish().unwrap();
        drop(log);

        assert_eq!(
            std::fs::read_to_string(&paths.long).unwrap(),
            "\n2017-03-01:\n"
        );
        assert_eq!(
            std::fs::read_to_string(&paths.short).unwrap(),
            "\n2017-03-01:\nOpen short position in AAPL at 139.79.\n"
        );
    }
}
