// schedule.rs
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;

pub const USAGE: &str = "Usage:
  bridge_simulation
  bridge_simulation <vehicle count> <probability of northbound> <delay> { <vehicle count> <probability of northbound> <delay> ... }
  bridge_simulation schedule.txt";

/// One group of vehicles released together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub count: u32,
    pub northbound_probability: f64,
    pub delay_secs: u64,
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("wrong number of arguments.\n{}", USAGE)]
    Usage,
    #[error("cannot read schedule file {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("cannot read input: {0}")]
    Input(#[from] io::Error),
    #[error("missing {what}")]
    MissingValue { what: String },
    #[error("invalid {what}: {token:?}")]
    Malformed { what: String, token: String },
    #[error("{what} out of range: {value}")]
    OutOfRange { what: String, value: String },
}

/// Where the batch schedule comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleSource {
    /// Prompt on stdin.
    Interactive,
    /// Whitespace-separated file: the group count, then one triple per group.
    File(PathBuf),
    /// Positional `count probability delay` triples.
    Inline(Vec<String>),
}

impl ScheduleSource {
    /// Picks the source from the command-line arguments (program name excluded).
    pub fn from_args(args: Vec<String>) -> Result<Self, ScheduleError> {
        match args.len() {
            0 => Ok(ScheduleSource::Interactive),
            1 => Ok(ScheduleSource::File(PathBuf::from(&args[0]))),
            n if n % 3 == 0 => Ok(ScheduleSource::Inline(args)),
            _ => Err(ScheduleError::Usage),
        }
    }

    pub fn load(self) -> Result<Vec<Batch>, ScheduleError> {
        match self {
            ScheduleSource::Interactive => {
                let stdin = io::stdin();
                let stdout = io::stdout();
                read_interactive(stdin.lock(), stdout.lock())
            }
            ScheduleSource::File(path) => match fs::read_to_string(&path) {
                Ok(content) => parse_schedule_file(&content),
                Err(source) => Err(ScheduleError::Io { path, source }),
            },
            ScheduleSource::Inline(args) => parse_triples(&args),
        }
    }
}

/// Parses positional `count probability delay` triples.
pub fn parse_triples(args: &[String]) -> Result<Vec<Batch>, ScheduleError> {
    if args.len() % 3 != 0 {
        return Err(ScheduleError::Usage);
    }
    args.chunks(3)
        .enumerate()
        .map(|(i, triple)| parse_batch(i + 1, &triple[0], &triple[1], &triple[2]))
        .collect()
}

/// Parses the schedule file format. Tokens after the last group are ignored.
pub fn parse_schedule_file(content: &str) -> Result<Vec<Batch>, ScheduleError> {
    let mut tokens = content.split_whitespace();
    let groups = parse_group_count(tokens.next())?;

    let mut batches = Vec::with_capacity(groups);
    for group in 1..=groups {
        let mut field = |what: &str| {
            tokens.next().ok_or_else(|| ScheduleError::MissingValue {
                what: format!("{what} for group {group}"),
            })
        };
        let count = field("vehicle count")?;
        let probability = field("northbound probability")?;
        let delay = field("delay")?;
        batches.push(parse_batch(group, count, probability, delay)?);
    }
    Ok(batches)
}

/// Prompts for the schedule one value at a time.
pub fn read_interactive<R, W>(input: R, mut output: W) -> Result<Vec<Batch>, ScheduleError>
where
    R: BufRead,
    W: Write,
{
    let mut tokens = Tokens::new(input);
    let mut ask = |prompt: &str, what: &str| -> Result<String, ScheduleError> {
        write!(output, "{prompt}")?;
        output.flush()?;
        tokens.next_token()?.ok_or_else(|| ScheduleError::MissingValue {
            what: what.to_string(),
        })
    };

    let groups_token = ask("Enter the number of groups: ", "number of groups")?;
    let groups = parse_group_count(Some(groups_token.as_str()))?;

    let mut batches = Vec::with_capacity(groups);
    for group in 1..=groups {
        let count = ask(
            &format!("Enter the number of vehicles in group {group}: "),
            &format!("vehicle count for group {group}"),
        )?;
        let probability = ask(
            &format!("Enter the percentage of northbound in group {group}: "),
            &format!("northbound probability for group {group}"),
        )?;
        let delay = ask(
            &format!("Enter the delay in seconds for group {group}: "),
            &format!("delay for group {group}"),
        )?;
        batches.push(parse_batch(group, &count, &probability, &delay)?);
    }
    Ok(batches)
}

fn parse_group_count(token: Option<&str>) -> Result<usize, ScheduleError> {
    let token = token.ok_or_else(|| ScheduleError::MissingValue {
        what: "number of groups".to_string(),
    })?;
    let groups: i64 = token.parse().map_err(|_| ScheduleError::Malformed {
        what: "number of groups".to_string(),
        token: token.to_string(),
    })?;
    usize::try_from(groups).map_err(|_| ScheduleError::OutOfRange {
        what: "number of groups".to_string(),
        value: token.to_string(),
    })
}

fn parse_batch(group: usize, count: &str, probability: &str, delay: &str) -> Result<Batch, ScheduleError> {
    let malformed = |what: &str, token: &str| ScheduleError::Malformed {
        what: format!("{what} for group {group}"),
        token: token.to_string(),
    };
    let out_of_range = |what: &str, token: &str| ScheduleError::OutOfRange {
        what: format!("{what} for group {group}"),
        value: token.to_string(),
    };

    let count_value: i64 = count
        .parse()
        .map_err(|_| malformed("vehicle count", count))?;
    let count_value = u32::try_from(count_value)
        .ok()
        .filter(|&c| c > 0)
        .ok_or_else(|| out_of_range("vehicle count", count))?;

    let probability_value: f64 = probability
        .parse()
        .map_err(|_| malformed("northbound probability", probability))?;
    if !(0.0..=1.0).contains(&probability_value) {
        return Err(out_of_range("northbound probability", probability));
    }

    let delay_value: i64 = delay.parse().map_err(|_| malformed("delay", delay))?;
    let delay_value =
        u64::try_from(delay_value).map_err(|_| out_of_range("delay", delay))?;

    Ok(Batch {
        count: count_value,
        northbound_probability: probability_value,
        delay_secs: delay_value,
    })
}

/// Whitespace tokens pulled lazily from a line reader.
struct Tokens<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    fn next_token(&mut self) -> io::Result<Option<String>> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
        Ok(self.pending.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn source_follows_argument_count() {
        assert_eq!(ScheduleSource::from_args(vec![]).unwrap(), ScheduleSource::Interactive);
        assert_eq!(
            ScheduleSource::from_args(args(&["schedule.txt"])).unwrap(),
            ScheduleSource::File(PathBuf::from("schedule.txt"))
        );
        assert!(matches!(
            ScheduleSource::from_args(args(&["1", "0.5", "0", "2", "1", "3"])).unwrap(),
            ScheduleSource::Inline(v) if v.len() == 6
        ));
        assert!(matches!(
            ScheduleSource::from_args(args(&["1", "0.5"])),
            Err(ScheduleError::Usage)
        ));
        assert!(matches!(
            ScheduleSource::from_args(args(&["1", "0.5", "0", "2"])),
            Err(ScheduleError::Usage)
        ));
    }

    #[test]
    fn parses_inline_triples() {
        let batches = parse_triples(&args(&["5", "0.25", "2", "1", "1", "0"])).unwrap();
        assert_eq!(
            batches,
            vec![
                Batch {
                    count: 5,
                    northbound_probability: 0.25,
                    delay_secs: 2
                },
                Batch {
                    count: 1,
                    northbound_probability: 1.0,
                    delay_secs: 0
                },
            ]
        );
    }

    #[test]
    fn rejects_out_of_range_values() {
        for bad in [
            ["0", "0.5", "1"],
            ["-3", "0.5", "1"],
            ["2", "1.5", "1"],
            ["2", "-0.1", "1"],
            ["2", "NaN", "1"],
            ["2", "0.5", "-1"],
        ] {
            let err = parse_triples(&args(&bad)).unwrap_err();
            assert!(matches!(err, ScheduleError::OutOfRange { .. }), "{bad:?} gave {err}");
        }
    }

    #[test]
    fn rejects_partial_tokens() {
        for bad in [["2x", "0.5", "1"], ["2", "0.5abc", "1"], ["2", "0.5", "1.0"]] {
            let err = parse_triples(&args(&bad)).unwrap_err();
            assert!(matches!(err, ScheduleError::Malformed { .. }), "{bad:?} gave {err}");
        }
    }

    #[test]
    fn parses_schedule_file() {
        let content = "2\n3 0.5 1\n4 0 0\nextra tokens are ignored";
        let batches = parse_schedule_file(content).unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].count, 3);
        assert_eq!(batches[1].northbound_probability, 0.0);
    }

    #[test]
    fn schedule_file_with_missing_group() {
        let err = parse_schedule_file("2\n3 0.5 1\n").unwrap_err();
        assert!(matches!(err, ScheduleError::MissingValue { what } if what.contains("group 2")));

        let err = parse_schedule_file("").unwrap_err();
        assert!(matches!(err, ScheduleError::MissingValue { .. }));
    }

    #[test]
    fn empty_schedule_is_valid() {
        assert!(parse_schedule_file("0").unwrap().is_empty());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ScheduleSource::File(PathBuf::from("/definitely/not/here.txt"))
            .load()
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }

    #[test]
    fn interactive_prompts_per_value() {
        let input = "1\n2\n0.75 3\n";
        let mut output = Vec::new();
        let batches = read_interactive(input.as_bytes(), &mut output).unwrap();

        assert_eq!(
            batches,
            vec![Batch {
                count: 2,
                northbound_probability: 0.75,
                delay_secs: 3
            }]
        );
        let prompts = String::from_utf8(output).unwrap();
        assert!(prompts.starts_with("Enter the number of groups: "));
        assert!(prompts.contains("Enter the delay in seconds for group 1: "));
    }

    #[test]
    fn interactive_eof_is_an_error() {
        let err = read_interactive("1\n4\n".as_bytes(), Vec::<u8>::new()).unwrap_err();
        assert!(matches!(err, ScheduleError::MissingValue { .. }));
    }
}
