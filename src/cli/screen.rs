//! Interactive poster screen.
//!
//! Prompts for the brand name and offer, generates a poster, then offers to
//! share or save it. Every failure is printed as a notice and the screen goes
//! back to waiting for input.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use poster_studio::config::expand_tilde;
use poster_studio::session::{Notice, PosterSession};
use poster_studio::share::{SaveToDirectory, ShareTarget};

/// What the user picked after a poster was generated.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Share,
    Save(Option<PathBuf>),
    New,
    Quit,
    Unknown(String),
}

fn parse_action(line: &str) -> Action {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "s" | "share" => Action::Share,
        "a" | "save" => {
            if rest.is_empty() {
                Action::Save(None)
            } else {
                Action::Save(Some(expand_tilde(Path::new(rest))))
            }
        }
        "n" | "new" | "" => Action::New,
        "q" | "quit" | "exit" => Action::Quit,
        other => Action::Unknown(other.to_string()),
    }
}

/// Print `label` and read one line. `None` on end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> std::io::Result<Option<String>> {
    write!(output, "{}", label)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn show_notice<W: Write>(output: &mut W, notice: &Notice) -> std::io::Result<()> {
    writeln!(output, "[!] {}", notice)
}

/// Run the screen until the user quits or input ends.
pub async fn run_screen<R: BufRead, W: Write>(
    session: &mut PosterSession,
    share_target: &dyn ShareTarget,
    default_save_dir: Option<PathBuf>,
    input: &mut R,
    output: &mut W,
) -> std::io::Result<()> {
    writeln!(output, "Glownify Poster Studio")?;
    writeln!(output, "Auto-generate salon posters in seconds.")?;
    writeln!(output)?;

    loop {
        let Some(salon_name) = prompt(input, output, "Salon / Brand Name *: ")? else {
            return Ok(());
        };
        let Some(offer) = prompt(input, output, "Offer / Tagline: ")? else {
            return Ok(());
        };

        session.set_salon_name(salon_name);
        session.set_offer(offer);

        writeln!(output, "Generating poster...")?;
        match session.generate_or_notice().await {
            Ok(poster) => {
                writeln!(output, "Generated Poster: {}", poster.path().display())?;
            }
            Err(notice) => {
                show_notice(output, &notice)?;
                writeln!(output)?;
                continue;
            }
        }

        loop {
            let Some(line) = prompt(
                input,
                output,
                "[s]hare, s[a]ve [dir], [n]ew poster, [q]uit: ",
            )?
            else {
                return Ok(());
            };

            match parse_action(&line) {
                Action::Share => {
                    if let Err(e) = session.share(share_target) {
                        show_notice(output, &Notice::from(&e))?;
                    }
                }
                Action::Save(dir) => {
                    let Some(dir) = dir.or_else(|| default_save_dir.clone()) else {
                        writeln!(output, "No save directory given (try: save ~/Pictures)")?;
                        continue;
                    };
                    let Some(poster) = session.poster() else {
                        continue;
                    };
                    match SaveToDirectory::new(dir).save(poster.path()) {
                        Ok(dest) => writeln!(output, "Saved to: {}", dest.display())?,
                        Err(e) => show_notice(output, &Notice::from(&e))?,
                    }
                }
                Action::New => {
                    writeln!(output)?;
                    break;
                }
                Action::Quit => return Ok(()),
                Action::Unknown(word) => {
                    writeln!(output, "Unknown action '{}'", word)?;
                }
            }
        }
    }
}
