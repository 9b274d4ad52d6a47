// UI layer: the blocking questions the program may ask (token paste-back,
// numbered selections) sit behind the `Prompt` trait so the flows that use
// them can run against scripted answers in tests.

use crate::errors::TrelloMoveError;
use anyhow::{anyhow, bail, Context, Result};
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, IsTerminal, Write};
use std::time::Duration;

/// Interactive collaborator used by the first-run flow and by the fuzzy
/// resolver when a needle is ambiguous.
pub trait Prompt {
    /// Print one line of informational output.
    fn say(&mut self, line: &str);

    /// Ask for a line of free text. The answer is trimmed and non-empty.
    fn ask_text(&mut self, prompt: &str) -> Result<String>;

    /// Show `options` as a 1-indexed list under `heading`, ask with
    /// `prompt`, and return the zero-based index of the chosen option.
    fn choose(&mut self, heading: &str, options: &[String], prompt: &str) -> Result<usize>;
}

/// `Prompt` backed by the real terminal through `dialoguer`. When stdin or
/// stderr is not a terminal (piped input, redirected output) answers are
/// read as plain lines from stdin instead.
#[derive(Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    fn interactive() -> bool {
        io::stdin().is_terminal() && io::stderr().is_terminal()
    }
}

impl Prompt for TerminalPrompt {
    fn say(&mut self, line: &str) {
        println!("{line}");
    }

    fn ask_text(&mut self, prompt: &str) -> Result<String> {
        if !Self::interactive() {
            let answer = read_answer(&mut io::stdin().lock(), &mut io::stdout(), prompt)?;
            if answer.is_empty() {
                bail!("No answer given for '{prompt}'");
            }
            return Ok(answer);
        }
        // dialoguer rejects empty input unless allow_empty is set.
        let answer: String = Input::new()
            .with_prompt(prompt)
            .interact_text()
            .context("Failed to read answer from terminal")?;
        Ok(answer.trim().to_string())
    }

    fn choose(&mut self, heading: &str, options: &[String], prompt: &str) -> Result<usize> {
        println!("\n{heading}");
        for (i, option) in options.iter().enumerate() {
            println!("{}. {}", i + 1, option);
        }
        let count = options.len();

        if !Self::interactive() {
            let answer = read_answer(&mut io::stdin().lock(), &mut io::stdout(), prompt)?;
            return parse_selection(&answer, count);
        }

        // Out-of-range or non-numeric answers are re-asked rather than
        // turned into a wrong pick.
        let choice: usize = Input::new()
            .with_prompt(prompt)
            .validate_with(move |n: &usize| -> Result<(), String> {
                if (1..=count).contains(n) {
                    Ok(())
                } else {
                    Err(format!("Enter a number between 1 and {count}"))
                }
            })
            .interact_text()
            .context("Failed to read selection from terminal")?;
        Ok(choice - 1)
    }
}

/// Write `prompt: ` to `output` and read one trimmed line from `input`.
/// End of input is an error rather than an empty answer.
fn read_answer<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<String> {
    write!(output, "{prompt}: ")?;
    output.flush()?;
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("Failed to read answer from stdin")?;
    if read == 0 {
        bail!("Input ended before an answer for '{prompt}' was given");
    }
    Ok(line.trim().to_string())
}

/// Turn a 1-based answer into a zero-based index below `count`.
fn parse_selection(answer: &str, count: usize) -> Result<usize> {
    let choice: usize = answer
        .parse()
        .map_err(|_| anyhow!("Selection '{answer}' is not a number"))?;
    if !(1..=count).contains(&choice) {
        return Err(TrelloMoveError::InvalidSelection { choice, count }.into());
    }
    Ok(choice - 1)
}

/// Start a spinner on stderr for a blocking network call. indicatif keeps
/// it hidden when stderr is not a terminal.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
