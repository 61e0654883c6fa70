use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Append-only sink for the mixed output stream. Every append is flushed
/// through so progress is observable while a session runs.
pub struct ByteSink<W: Write> {
    out: W,
}

impl ByteSink<File> {
    /// Creates (truncating) the output file.
    pub fn create(path: &Path) -> io::Result<ByteSink<File>> {
        Ok(ByteSink::new(File::create(path)?))
    }
}

impl<W: Write> ByteSink<W> {
    pub fn new(out: W) -> ByteSink<W> {
        ByteSink { out }
    }

    pub fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)?;
        self.out.flush()
    }
}

/// Timestamped progress log: one `<elapsed_ms>, <cumulative_samples>` line
/// per mix iteration, flushed per record.
pub struct StatsLog<W: Write> {
    out: W,
}

impl StatsLog<File> {
    /// Creates (truncating) the stats file.
    pub fn create(path: &Path) -> io::Result<StatsLog<File>> {
        Ok(StatsLog::new(File::create(path)?))
    }
}

impl<W: Write> StatsLog<W> {
    pub fn new(out: W) -> StatsLog<W> {
        StatsLog { out }
    }

    pub fn record(&mut self, elapsed_ms: u64, written_samples: u64) -> io::Result<()> {
        writeln!(self.out, "{}, {}", elapsed_ms, written_samples)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_appends_in_order() {
        let mut sink = ByteSink::new(Vec::new());
        sink.append(&[1, 2]).unwrap();
        sink.append(&[]).unwrap();
        sink.append(&[3]).unwrap();
        assert_eq!(sink.out, vec![1, 2, 3]);
    }

    #[test]
    fn stats_records_are_comma_space_separated_lines() {
        let mut stats = StatsLog::new(Vec::new());
        stats.record(0, 72).unwrap();
        stats.record(1503, 150).unwrap();
        assert_eq!(String::from_utf8(stats.out).unwrap(), "0, 72\n1503, 150\n");
    }
}
