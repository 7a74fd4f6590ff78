use crate::error::{GomiError, Result};
use crate::gomi::preview;
use crate::gomi::record::Record;
use crate::gomi::util::humanize_since;
use chrono::{DateTime, Local};
use std::io::{self, BufRead, Stderr, StdinLock, Write};

/// Chooses one record to restore.
///
/// `Ok(None)` means the user declined to choose.
pub trait Selector {
    fn choose(&mut self, records: &[Record]) -> Result<Option<usize>>;
}

impl<F> Selector for F
where
    F: FnMut(&[Record]) -> Result<Option<usize>>,
{
    fn choose(&mut self, records: &[Record]) -> Result<Option<usize>> {
        self(records)
    }
}

fn search_key(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Line-oriented picker: a number picks a row, other text narrows the list by
/// name, an empty line or EOF cancels. The first listed row is shown in
/// detail with a preview of its archived content.
pub struct PromptSelector<R, W> {
    input: R,
    output: W,
    now: DateTime<Local>,
}

impl PromptSelector<StdinLock<'static>, Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> PromptSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            now: Local::now(),
        }
    }

    fn details(&mut self, record: &Record) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "Name:       {}", record.name)?;
        writeln!(self.output, "Path:       {}", record.source_path.display())?;
        writeln!(
            self.output,
            "DeletedAt:  {}",
            humanize_since(record.timestamp, self.now)
        )?;
        writeln!(self.output, "Content:")?;
        write!(self.output, "{}", preview::head(&record.archive_path))
    }

    fn render(&mut self, records: &[Record], rows: &[usize]) -> io::Result<()> {
        writeln!(self.output, "Which to restore?")?;
        for (pos, &idx) in rows.iter().enumerate() {
            let record = &records[idx];
            writeln!(
                self.output,
                "{:>3}) {}  {}  ({})",
                pos + 1,
                record.name,
                record.source_path.display(),
                humanize_since(record.timestamp, self.now)
            )?;
        }
        if let Some(&first) = rows.first() {
            self.details(&records[first])?;
        }
        write!(self.output, "> ")?;
        self.output.flush()
    }

    fn prompt(&mut self, records: &[Record]) -> io::Result<Option<usize>> {
        let mut rows = (0..records.len()).collect::<Vec<_>>();
        loop {
            self.render(records, &rows)?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let answer = line.trim();
            if answer.is_empty() {
                return Ok(None);
            }

            if let Ok(number) = answer.parse::<usize>() {
                if (1..=rows.len()).contains(&number) {
                    return Ok(Some(rows[number - 1]));
                }
                writeln!(self.output, "no entry numbered {number}")?;
                continue;
            }

            let needle = search_key(answer);
            let matches = rows
                .iter()
                .copied()
                .filter(|&idx| search_key(&records[idx].name).contains(&needle))
                .collect::<Vec<_>>();
            match matches.as_slice() {
                [] => writeln!(self.output, "no match for {answer:?}")?,
                [only] => return Ok(Some(*only)),
                _ => rows = matches,
            }
        }
    }
}

impl<R: BufRead, W: Write> Selector for PromptSelector<R, W> {
    fn choose(&mut self, records: &[Record]) -> Result<Option<usize>> {
        self.prompt(records)
            .map_err(|err| GomiError::Prompt { source: err })
    }
}
