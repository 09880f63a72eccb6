//! Emission queries over a run's hourly ledger.
//!
//! The interactive session reads a start time, an end time and then whether
//! to continue. `END` at any prompt (or `N` at the last one) stops it, as does
//! end of input. Unparsable times print `Invalid input` and report zero.

use std::io::{BufRead, Write};

use ws_core::{Timestamp, format_timestamp, parse_timestamp};
use ws_model::EmissionsLedger;

use crate::error::{AppError, AppResult};

pub const END: &str = "END";

/// Summary of a run's ledger.
#[derive(Debug, Clone)]
pub struct LedgerSummary {
    pub entries: usize,
    pub first: Option<Timestamp>,
    pub last: Option<Timestamp>,
    pub total: f64,
}

pub fn summarize(ledger: &EmissionsLedger) -> LedgerSummary {
    let mut keys = ledger.iter().map(|(k, _)| *k);
    let first = keys.next();
    let last = keys.last().or(first);
    LedgerSummary {
        entries: ledger.len(),
        first,
        last,
        total: ledger.total(),
    }
}

/// Sum the ledger over every hour from `start` to `end` inclusive.
pub fn sum_between(ledger: &EmissionsLedger, start: &str, end: &str) -> AppResult<f64> {
    let start = parse_timestamp(start).map_err(|e| AppError::InvalidInput(e.to_string()))?;
    let end = parse_timestamp(end).map_err(|e| AppError::InvalidInput(e.to_string()))?;
    Ok(ledger.sum_hourly(start, end))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryStats {
    pub answered: usize,
    pub invalid: usize,
}

/// Operator query loop over a ledger.
pub struct QuerySession<'a> {
    ledger: &'a EmissionsLedger,
}

impl<'a> QuerySession<'a> {
    pub fn new(ledger: &'a EmissionsLedger) -> Self {
        Self { ledger }
    }

    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> AppResult<QueryStats> {
        let mut stats = QueryStats::default();
        let summary = summarize(self.ledger);

        loop {
            writeln!(
                output,
                "You can query the model for emissions over a time period, with times like 2019-05-31 13:00:00"
            )?;
            match (summary.first, summary.last) {
                (Some(first), Some(last)) => writeln!(
                    output,
                    "The run has {} emitting timesteps from {} to {}",
                    summary.entries,
                    format_timestamp(&first),
                    format_timestamp(&last)
                )?,
                _ => writeln!(output, "The run has no emitting timesteps")?,
            }
            write!(output, "End this prompt by \"{END}\"\nEnter the start time please: ")?;
            output.flush()?;
            let Some(start) = read_answer(&mut input)? else {
                break;
            };
            if start == END {
                break;
            }

            write!(output, "End this prompt by \"{END}\"\nEnter the end time please: ")?;
            output.flush()?;
            let Some(end) = read_answer(&mut input)? else {
                break;
            };
            if end == END {
                break;
            }

            let emissions = match sum_between(self.ledger, &start, &end) {
                Ok(sum) => sum,
                Err(_) => {
                    writeln!(output, "Invalid input")?;
                    stats.invalid += 1;
                    0.0
                }
            };
            writeln!(
                output,
                "The emissions between {start} and {end} are: {emissions}"
            )?;
            stats.answered += 1;

            write!(
                output,
                "Any other time periods? End this prompt by \"{END}\".\nInput here (Y/N): "
            )?;
            output.flush()?;
            match read_answer(&mut input)? {
                None => break,
                Some(answer) if answer == END || answer == "N" => break,
                Some(_) => {}
            }
        }
        writeln!(output)?;
        Ok(stats)
    }
}

/// Next trimmed line, or `None` at end of input.
fn read_answer<R: BufRead>(input: &mut R) -> AppResult<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
