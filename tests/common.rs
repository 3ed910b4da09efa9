use std::io::Write;

use lookback::config::LookbackConfig;
use tempfile::NamedTempFile;

/// Writes the standard 10-row, 2-series hourly fixture.
///
/// Five rows fall on 2014-01-01 and five on 2014-01-02, so a cutoff of
/// 2014-01-01 counts exactly 5 rows. Row r holds (r + 1, 100 + r).
pub fn write_fixture() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for r in 0..10 {
        let day = if r < 5 { 1 } else { 2 };
        writeln!(
            file,
            "2014-01-{:02},{:02}:00:00,{},{}",
            day,
            r % 5,
            r + 1,
            100 + r
        )
        .unwrap();
    }
    file.flush().unwrap();
    file
}

/// Configuration matching [`write_fixture`]: window 2, horizon 1,
/// per-series scaling, training cutoff after the first day.
pub fn fixture_config(file: &NamedTempFile) -> LookbackConfig {
    LookbackConfig {
        source: file.path().to_path_buf(),
        train_cutoff: "2014-01-01".to_string(),
        window: 2,
        horizon: 1,
        normalise: 2,
    }
}
