use std::io::{self, BufRead, Write};

/// The prompt shown before reading an abstract
pub static PROMPT: &str = "Please enter your abstract: ";

/// Prompt for an abstract and read a single line of input
pub fn read_abstract<R: BufRead, W: Write>(mut reader: R, mut writer: W) -> io::Result<String> {
    write!(writer, "{}", PROMPT)?;
    writer.flush()?;

    let mut line = String::new();
    reader.read_line(&mut line)?;

    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}
