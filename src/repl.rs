use std::io::{self, BufRead, Write};

pub struct REPL {}

impl REPL {
    /// Asks on the terminal whether to read the whole trace or only a prefix.
    pub fn ask_address_limit(&self) -> Result<Option<usize>, io::Error> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        ask_address_limit(&mut stdin.lock(), &mut stdout.lock())
    }
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<String> {
    write!(output, "{}", question)?;
    output.flush()?;
    let mut buffer = String::new();
    if input.read_line(&mut buffer)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no answer on standard input",
        ));
    }
    Ok(buffer.trim().to_string())
}

/// `None` means the whole file. Questions are repeated until the answer parses.
pub fn ask_address_limit<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<usize>> {
    loop {
        let answer = prompt(input, output, "Read the whole trace file? (y/n): ")?;
        match answer.as_str() {
            "y" | "Y" => return Ok(None),
            "n" | "N" => break,
            _ => continue,
        }
    }
    loop {
        let answer = prompt(input, output, "Number of addresses to read: ")?;
        match answer.parse() {
            Ok(count) => return Ok(Some(count)),
            Err(_) => writeln!(output, "{:?} is not a number", answer)?,
        }
    }
}
