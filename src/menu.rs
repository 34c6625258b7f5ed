//! Interactive operation selector, used when no subcommand is given.

use crate::app::Operation;
use crate::error::InputError;
use anyhow::Result;
use std::io::{BufRead, Write};

pub fn parse_choice(input: &str) -> Result<u8, InputError> {
    match input.trim() {
        "1" => Ok(1),
        "2" => Ok(2),
        "3" => Ok(3),
        other => Err(InputError::InvalidOperation(other.to_string())),
    }
}

/// Empty input means no limit
pub fn parse_limit(input: &str) -> Result<Option<usize>, InputError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    input
        .parse::<usize>()
        .map(Some)
        .map_err(|_| InputError::InvalidLimit(input.to_string()))
}

fn read_line<R: BufRead>(input: &mut R) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line)
}

/// Show the menu and read the operation.
///
/// Returns `Err` wrapping an [`InputError`] for invalid answers, so callers
/// can tell user mistakes apart from I/O failures.
pub fn prompt_operation<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Operation> {
    writeln!(output, "1. Process repositories")?;
    writeln!(output, "2. Remove all existing folders")?;
    writeln!(output, "3. Remove existing folders and process new repositories")?;
    write!(output, "Select operation (1-3): ")?;
    output.flush()?;

    let choice = parse_choice(&read_line(input)?)?;
    if choice == 2 {
        return Ok(Operation::Clean);
    }

    write!(
        output,
        "Enter the number of repositories to process (press Enter for no limit): "
    )?;
    output.flush()?;
    let limit = parse_limit(&read_line(input)?)?;

    Ok(if choice == 1 {
        Operation::Process { limit }
    } else {
        Operation::CleanThenProcess { limit }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_menu(answers: &str) -> (Result<Operation>, String) {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = prompt_operation(&mut input, &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice(" 1\n"), Ok(1));
        assert_eq!(parse_choice("3"), Ok(3));
        assert_eq!(parse_choice("4"), Err(InputError::InvalidOperation("4".into())));
        assert_eq!(parse_choice(""), Err(InputError::InvalidOperation(String::new())));
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit("\n"), Ok(None));
        assert_eq!(parse_limit(" 25 \n"), Ok(Some(25)));
        assert_eq!(parse_limit("ten"), Err(InputError::InvalidLimit("ten".into())));
        assert_eq!(parse_limit("-3"), Err(InputError::InvalidLimit("-3".into())));
    }

    #[test]
    fn test_menu_process_with_limit() {
        let (result, shown) = run_menu("1\n10\n");
        assert_eq!(result.unwrap(), Operation::Process { limit: Some(10) });
        assert!(shown.contains("Select operation (1-3)"));
        assert!(shown.contains("press Enter for no limit"));
    }

    #[test]
    fn test_menu_clean_does_not_ask_for_limit() {
        let (result, shown) = run_menu("2\n");
        assert_eq!(result.unwrap(), Operation::Clean);
        assert!(!shown.contains("number of repositories"));
    }

    #[test]
    fn test_menu_clean_then_process_without_limit() {
        let (result, _) = run_menu("3\n\n");
        assert_eq!(result.unwrap(), Operation::CleanThenProcess { limit: None });
    }

    #[test]
    fn test_menu_invalid_input_is_input_error() {
        let (result, _) = run_menu("9\n");
        let err = result.unwrap_err();
        assert_eq!(
            err.downcast_ref::<InputError>(),
            Some(&InputError::InvalidOperation("9".into()))
        );

        let (result, _) = run_menu("1\nabc\n");
        let err = result.unwrap_err();
        assert!(matches!(err.downcast_ref::<InputError>(), Some(InputError::InvalidLimit(_))));
    }
}
