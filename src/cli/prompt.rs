use std::io::{self, BufRead, Write};

/// Asks a `[y/N]` question until the answer is `y`, `n` or empty.
///
/// Case-insensitive; empty input and end of input both mean no.
pub fn ask_yes_no<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> io::Result<bool> {
    write!(output, "{} [y/N]: ", question)?;
    output.flush()?;

    loop {
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }

        match line.trim().to_lowercase().as_str() {
            "y" => return Ok(true),
            "n" | "" => return Ok(false),
            _ => {
                write!(output, "Invalid answer, please try again [y/N]: ")?;
                output.flush()?;
            }
        }
    }
}

/// Asks until a non-blank line is entered and returns it trimmed.
///
/// End of input is an `UnexpectedEof` error.
pub fn ask_non_empty<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> io::Result<String> {
    loop {
        write!(output, "{} ", question)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no input available",
            ));
        }

        let answer = line.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
    }
}
