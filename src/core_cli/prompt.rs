use anyhow::{bail, Context, Result};
use dialoguer::Password;
use std::io::{BufRead, IsTerminal};

/// Asks for a secret, hidden when stdin is a terminal and read as a plain
/// line otherwise (e.g. piped from a file).
pub fn prompt_secret(prompt: &str, confirm: bool) -> Result<String> {
    if !std::io::stdin().is_terminal() {
        println!("{}", prompt);
        let stdin = std::io::stdin();
        return read_secret_line(&mut stdin.lock());
    }

    let mut input = Password::new().with_prompt(prompt);
    if confirm {
        input = input.with_confirmation("Repeat password", "Passwords do not match");
    }
    input.interact().context("Failed to read password")
}

/// Reads one line, without its line ending. Empty secrets are refused.
pub fn read_secret_line<R: BufRead>(reader: &mut R) -> Result<String> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .context("Failed to read password")?;
    let secret = line.trim_end_matches(&['\r', '\n'][..]);
    if secret.is_empty() {
        bail!("Empty password");
    }
    Ok(secret.to_string())
}
