//! Interactive acquisition of a market configuration.
//!
//! Asks for the four values in turn and keeps asking until each answer is a
//! positive integer (and the capacity does not exceed the total).

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use ticketmarket_core::MarketConfig;

const INVALID_INPUT: &str = "Invalid input. Please enter a positive integer.";

/// Read a complete configuration from `input`, writing prompts to `output`.
pub fn prompt_market_config<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<MarketConfig> {
    let total_tickets = prompt_positive(
        input,
        output,
        "Please enter the total number of tickets: ",
        "Total number of tickets",
        None,
    )?;
    let ticket_release_rate = prompt_positive(
        input,
        output,
        "Please enter the ticket release rate: ",
        "Ticket release rate",
        None,
    )?;
    let customer_retrieval_rate = prompt_positive(
        input,
        output,
        "Please enter the customer retrieval rate: ",
        "Customer retrieval rate",
        None,
    )?;
    let max_ticket_capacity = prompt_positive(
        input,
        output,
        "Please enter the maximum number of tickets: ",
        "Maximum number of tickets",
        Some(total_tickets),
    )?;

    Ok(MarketConfig::new(
        total_tickets,
        ticket_release_rate,
        customer_retrieval_rate,
        max_ticket_capacity,
    ))
}

fn prompt_positive<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    field: &str,
    upper_bound: Option<u32>,
) -> Result<u32> {
    loop {
        writeln!(output, "{}", question)?;
        output.flush()?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .context("Failed to read configuration input")?;
        if read == 0 {
            bail!("Input closed before the configuration was complete");
        }

        let value = match line.trim().parse::<i64>() {
            Ok(value) => value,
            Err(_) => {
                writeln!(output, "{}", INVALID_INPUT)?;
                continue;
            }
        };

        if value <= 0 {
            writeln!(output, "{} must be a positive integer!", field)?;
            continue;
        }

        let Ok(value) = u32::try_from(value) else {
            writeln!(output, "{}", INVALID_INPUT)?;
            continue;
        };

        if let Some(bound) = upper_bound {
            if value > bound {
                writeln!(
                    output,
                    "{} cannot exceed total number of tickets!",
                    field
                )?;
                continue;
            }
        }

        return Ok(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_prompt(answers: &str) -> (Result<MarketConfig>, String) {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = prompt_market_config(&mut input, &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_valid_answers() {
        let (result, output) = run_prompt("100\n5\n4\n20\n");
        assert_eq!(result.unwrap(), MarketConfig::new(100, 5, 4, 20));
        assert!(output.contains("Please enter the total number of tickets"));
        assert!(output.contains("Please enter the maximum number of tickets"));
    }

    #[test]
    fn test_reprompts_on_non_numeric_input() {
        let (result, output) = run_prompt("lots\n10\n1\n1\n5\n");
        assert_eq!(result.unwrap(), MarketConfig::new(10, 1, 1, 5));
        assert!(output.contains(INVALID_INPUT));
    }

    #[test]
    fn test_reprompts_on_non_positive_input() {
        let (result, output) = run_prompt("10\n0\n-3\n2\n1\n5\n");
        assert_eq!(result.unwrap(), MarketConfig::new(10, 2, 1, 5));
        assert!(output.contains("Ticket release rate must be a positive integer!"));
    }

    #[test]
    fn test_reprompts_when_capacity_exceeds_total() {
        let (result, output) = run_prompt("10\n1\n1\n11\n10\n");
        assert_eq!(result.unwrap(), MarketConfig::new(10, 1, 1, 10));
        assert!(output.contains("Maximum number of tickets cannot exceed total number of tickets!"));
    }

    #[test]
    fn test_eof_is_an_error() {
        let (result, _) = run_prompt("10\n1\n");
        assert!(result.is_err());
    }
}
