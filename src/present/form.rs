//! Interactive terminal form
//!
//! Asks for each selection from a numbered menu. Day choices follow the
//! length of the chosen month.

use std::io::{self, BufRead, Write};

use crate::features::category::{FACILITIES, HOURS, MONTHS, PRECIPITATION};
use crate::features::{CategoryMap, HolidayCalendar};
use crate::{Result, Selection};

/// Ask until the answer is a listed option (by number or exact label)
pub fn choose<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    options: &[String],
) -> Result<String> {
    loop {
        writeln!(output, "{}", prompt)?;
        for (i, option) in options.iter().enumerate() {
            writeln!(output, "  {:>2}) {}", i + 1, option)?;
        }
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed").into());
        }
        let answer = line.trim();

        if let Ok(n) = answer.parse::<usize>() {
            if (1..=options.len()).contains(&n) {
                return Ok(options[n - 1].clone());
            }
        }
        if let Some(option) = options.iter().find(|o| o.as_str() == answer) {
            return Ok(option.clone());
        }
        writeln!(output, "Please choose one of the listed options")?;
    }
}

fn options_of(map: &CategoryMap) -> Vec<String> {
    map.labels().map(str::to_string).collect()
}

/// Collect a full selection
pub fn fill_selection<R: BufRead, W: Write>(
    calendar: &HolidayCalendar,
    input: &mut R,
    output: &mut W,
) -> Result<Selection> {
    let month = choose(input, output, "Elija el mes que quiere ver:", &options_of(&MONTHS))?;

    let month_code = MONTHS.code(&month)?;
    let num_days = calendar.days_in_month(month_code).unwrap_or(31);
    let days: Vec<String> = (1..=num_days).map(|d| d.to_string()).collect();
    let day = choose(input, output, "Elija el día que quiere ver:", &days)?;

    let hour = choose(input, output, "Elija la hora:", &options_of(&HOURS))?;
    let precipitation = choose(
        input,
        output,
        "Elija la estimación climatológica:",
        &options_of(&PRECIPITATION),
    )?;
    let facility = choose(input, output, "Elija el aparcamiento:", &options_of(&FACILITIES))?;

    Ok(Selection {
        month,
        day,
        hour,
        facility,
        precipitation,
    })
}
