//! Command-line arguments.

use std::path::PathBuf;

/// Usage text printed for `--help`.
pub const USAGE: &str = "\
Usage: mailverdict [OPTIONS] [TEXT...]

Classify an email as Productive or Unproductive.

Arguments:
  [TEXT...]          Email text; `-` reads it from standard input

Options:
  -f, --file <PATH>  Classify an email file instead of text
  -l, --lang <CODE>  Interface language: pt, en or es
  -c, --copy         Copy the suggested response to the clipboard
                     (on X11 the copy only outlives mailverdict when a
                     clipboard manager is running)
      --json         Print the result as JSON
  -h, --help         Print this help

Environment:
  MAILVERDICT_API_URL   Base URL of the classification service (required)
  MAILVERDICT_LANGUAGE  Default interface language
  RUST_LOG              Log filter";

/// Printed after a successful `--copy`.
pub const COPIED_NOTICE: &str = if cfg!(target_os = "linux") {
    "Suggested response copied to clipboard (kept after exit only if a clipboard manager is running)."
} else {
    "Suggested response copied to clipboard."
};

/// Where the email comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Text given on the command line.
    Text(String),
    /// Text read from standard input.
    Stdin,
    /// A file to upload.
    File(PathBuf),
}

/// Parsed options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// Email source.
    pub input: Input,
    /// Interface language code, if given.
    pub lang: Option<String>,
    /// Copy the suggestion after classifying.
    pub copy: bool,
    /// Print JSON instead of text.
    pub json: bool,
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print usage.
    Help,
    /// Classify an email.
    Classify(Args),
}

/// Parses arguments (without the program name).
pub fn parse<I>(args: I) -> Result<Command, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut words = Vec::new();
    let mut file = None;
    let mut lang = None;
    let mut copy = false;
    let mut json = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-f" | "--file" => {
                file = Some(PathBuf::from(
                    args.next().ok_or("--file needs a path")?,
                ));
            }
            "-l" | "--lang" => lang = Some(args.next().ok_or("--lang needs a code")?),
            "-c" | "--copy" => copy = true,
            "--json" => json = true,
            "--" => words.extend(args.by_ref()),
            flag if flag.starts_with('-') && flag != "-" => {
                return Err(format!("unknown option: {flag}"));
            }
            _ => words.push(arg),
        }
    }

    let input = match (file, words.as_slice()) {
        (Some(_), [_, ..]) => return Err("give either TEXT or --file, not both".into()),
        (Some(path), []) => Input::File(path),
        (None, []) => return Err("nothing to classify; pass TEXT, `-` or --file".into()),
        (None, [only]) if only == "-" => Input::Stdin,
        (None, _) => Input::Text(words.join(" ")),
    };

    Ok(Command::Classify(Args {
        input,
        lang,
        copy,
        json,
    }))
}
