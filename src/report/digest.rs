//! Console digest of a daily report

use super::aggregator::{HIGH_VOLUME_FLOOR, TOP_MARKET_CAP_COUNT};
use super::types::Report;
use crate::market::{CurrencyRecord, USD};
use chrono::{DateTime, Local};
use std::io::{self, Write};

pub const SEPARATOR: &str = "------------------------------------------------------------";

/// Write the human-readable digest printed after each cycle
///
/// Records without a USD quote print `n/a` in place of their figures; the
/// aggregator has already rejected such records wherever a figure depends
/// on them.
pub fn write_digest<W: Write + ?Sized>(
    out: &mut W,
    report: &Report,
    created_at: DateTime<Local>,
) -> io::Result<()> {
    writeln!(
        out,
        "Daily report of crypto according to CoinMarketCap of: {}",
        created_at.format("%Y-%m-%d %H:%M:%S%.6f")
    )?;
    writeln!(out)?;

    writeln!(
        out,
        "The highest trading volume currency of last 24h is {} with a volume of {}$",
        report.highest_traded.symbol,
        usd_figure(&report.highest_traded, |q| format!("{:.0}", q.volume_24h))
    )?;

    writeln!(out, "Top 10 by increment: ")?;
    for record in &report.top_10_by_increment {
        writeln!(out, "{}", mover_line(record))?;
    }
    writeln!(out)?;

    writeln!(out, "Top ten by decrement: ")?;
    for record in &report.top_10_by_decrement {
        writeln!(out, "{}", mover_line(record))?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "Total price of {} best currencies of CoinMarketCap ranking: {:.2}$",
        TOP_MARKET_CAP_COUNT, report.total_price_top_20
    )?;
    writeln!(
        out,
        "Total price of currencies that have a daily volume higher than {}M$: {:.2}$",
        HIGH_VOLUME_FLOOR / 1_000_000.0,
        report.total_price_of_higher_volume_currencies
    )?;
    writeln!(
        out,
        "Percentage change of {} best currencies of CoinMarketCap ranking: {:.2}%",
        TOP_MARKET_CAP_COUNT, report.percent_change_of_twenty_best
    )?;
    writeln!(out, "{}", SEPARATOR)
}

fn mover_line(record: &CurrencyRecord) -> String {
    format!(
        "{} {}%",
        record.symbol,
        usd_figure(record, |q| format!("{:.2}", q.percent_change_24h))
    )
}

fn usd_figure<F>(record: &CurrencyRecord, figure: F) -> String
where
    F: Fn(&crate::market::Quote) -> String,
{
    record
        .quote
        .get(USD)
        .map(figure)
        .unwrap_or_else(|| "n/a".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::Quote;
    use chrono::TimeZone;

    fn record(symbol: &str, volume: f64, pct: f64) -> CurrencyRecord {
        CurrencyRecord::new(symbol, USD, Quote::new(1.0, volume, pct, None))
    }

    #[test]
    fn test_write_digest() {
        let report = Report {
            highest_traded: record("USDT", 45_123_456_789.6, 0.01),
            top_10_by_increment: vec![record("PEPE", 1.0, 31.456), record("WIF", 1.0, 12.0)],
            top_10_by_decrement: vec![record("LUNA", 1.0, -42.123)],
            total_price_top_20: 71234.5,
            total_price_of_higher_volume_currencies: 40.0,
            percent_change_of_twenty_best: -2.22,
        };
        let created_at = Local.with_ymd_and_hms(2024, 3, 9, 8, 5, 7).unwrap();

        let mut out = Vec::new();
        write_digest(&mut out, &report, created_at).unwrap();
        let digest = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = digest.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Daily report of crypto according to CoinMarketCap of: 2024-03-09 08:05:07.000000",
                "",
                "The highest trading volume currency of last 24h is USDT with a volume of 45123456790$",
                "Top 10 by increment: ",
                "PEPE 31.46%",
                "WIF 12.00%",
                "",
                "Top ten by decrement: ",
                "LUNA -42.12%",
                "",
                "Total price of 20 best currencies of CoinMarketCap ranking: 71234.50$",
                "Total price of currencies that have a daily volume higher than 76M$: 40.00$",
                "Percentage change of 20 best currencies of CoinMarketCap ranking: -2.22%",
                SEPARATOR,
            ]
        );
    }

    #[test]
    fn test_missing_quote_prints_placeholder() {
        let odd = CurrencyRecord::new("ODD", "EUR", Quote::new(1.0, 1.0, 5.0, None));
        assert_eq!(mover_line(&odd), "ODD n/a%");
    }

    struct FullPipe;

    impl Write for FullPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_returned() {
        let report = Report {
            highest_traded: record("BTC", 1.0, 0.0),
            top_10_by_increment: Vec::new(),
            top_10_by_decrement: Vec::new(),
            total_price_top_20: 0.0,
            total_price_of_higher_volume_currencies: 0.0,
            percent_change_of_twenty_best: 0.0,
        };
        let created_at = Local.with_ymd_and_hms(2024, 3, 9, 8, 5, 7).unwrap();

        let err = write_digest(&mut FullPipe, &report, created_at).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
