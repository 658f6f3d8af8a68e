// fdi to InputClass converter
//
//  Copyright (C) 2014-2022 Ryan Specialty Group, LLC.
//
//  This file is part of fdi2iclass.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Convert HAL fdi files into `InputClass` sections.
//!
//! Each input file is translated in the order given and the sections are
//!   written to standard output
//!     (or to the file named by `--output`).
//! See the [`fdi2iclass`] crate for the details of the translation.

extern crate fdi2iclass;

use fdi2iclass::translate::{TranslateError, Translator};
use getopts::{Fail, Options};
use std::{
    env,
    fs::File,
    io::{self, BufWriter, Write},
};
use tracing_subscriber::EnvFilter;

/// Types of commands
#[derive(Debug, PartialEq)]
enum Command {
    Convert {
        inputs: Vec<String>,
        output: Option<String>,
        verbose: bool,
    },
    Usage,
}

/// Entrypoint for the converter
pub fn main() {
    let args: Vec<String> = env::args().collect();
    let program = &args[0];
    let opts = get_opts();
    let usage =
        opts.usage(&format!("Usage: {} [OPTIONS] [FILE...]", program));

    match parse_options(opts, args) {
        Ok(Command::Convert {
            inputs,
            output,
            verbose,
        }) => {
            init_logging(verbose);

            let code = match run(&inputs, output.as_deref()) {
                Ok(()) => exitcode::OK,
                Err(e) => {
                    eprintln!("fatal: {e}");
                    e.exit_code()
                }
            };

            std::process::exit(code);
        }
        Ok(Command::Usage) => {
            println!("{}", usage);
            std::process::exit(exitcode::OK);
        }
        Err(e) => {
            eprintln!("{}", e);
            println!("{}", usage);
            std::process::exit(exitcode::USAGE);
        }
    }
}

/// Translate each of `inputs` in turn,
///   writing to `output` or standard output.
///
/// Output is flushed even when translation fails so that sections
///   produced before the failure are not lost.
fn run(inputs: &[String], output: Option<&str>) -> Result<(), RunError> {
    let out: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .map_err(|e| RunError::Create(path.to_string(), e))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut translator = Translator::new(out);

    let result = inputs
        .iter()
        .try_for_each(|input| translator.translate_file(input).map(|_| ()));

    translator.flush().map_err(TranslateError::Write)?;
    Ok(result?)
}

/// Log to standard error,
///   filtered by `RUST_LOG` unless `verbose`.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Get 'Options'
fn get_opts() -> Options {
    let mut opts = Options::new();
    opts.optopt("o", "output", "write sections to FILE", "FILE");
    opts.optflag("v", "verbose", "log each translation step to stderr");
    opts.optflag("h", "help", "print this help menu");

    opts
}

/// Option parser
fn parse_options(opts: Options, args: Vec<String>) -> Result<Command, Fail> {
    let matches = opts.parse(&args[1..])?;

    if matches.opt_present("h") {
        return Ok(Command::Usage);
    }

    Ok(Command::Convert {
        output: matches.opt_str("o"),
        verbose: matches.opt_present("v"),
        inputs: matches.free,
    })
}

/// Converter error.
#[derive(Debug)]
enum RunError {
    /// The `--output` file could not be created.
    Create(String, io::Error),
    Translate(TranslateError),
}

impl RunError {
    fn exit_code(&self) -> exitcode::ExitCode {
        match self {
            Self::Create(..) => exitcode::CANTCREAT,
            Self::Translate(TranslateError::Write(_)) => exitcode::IOERR,
            Self::Translate(TranslateError::Read(_, e))
                if e.kind() == io::ErrorKind::NotFound =>
            {
                exitcode::NOINPUT
            }
            Self::Translate(TranslateError::Read(..)) => exitcode::IOERR,
            Self::Translate(
                TranslateError::Parse(..) | TranslateError::Invalid(..),
            ) => exitcode::DATAERR,
        }
    }
}

impl From<TranslateError> for RunError {
    fn from(e: TranslateError) -> Self {
        Self::Translate(e)
    }
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create(path, e) => write!(f, "{path}: {e}"),
            Self::Translate(e) => std::fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Create(_, e) => Some(e),
            Self::Translate(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn args(args: &[&str]) -> Vec<String> {
        std::iter::once("program")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn parse_options_help() {
        let result = parse_options(get_opts(), args(&["-h"]));

        assert_eq!(Ok(Command::Usage), result);
    }

    #[test]
    fn parse_options_help_long() {
        let result = parse_options(get_opts(), args(&["--help", "a.fdi"]));

        assert_eq!(Ok(Command::Usage), result);
    }

    #[test]
    fn parse_options_invalid() {
        let result = parse_options(get_opts(), args(&["-q"]));

        match result {
            Err(Fail::UnrecognizedOption(_)) => {}
            _ => panic!("Invalid option not caught"),
        }
    }

    #[test]
    fn parse_options_no_inputs() {
        let result = parse_options(get_opts(), args(&[]));

        assert_eq!(
            Ok(Command::Convert {
                inputs: vec![],
                output: None,
                verbose: false,
            }),
            result
        );
    }

    #[test]
    fn parse_options_inputs_in_order() {
        let result = parse_options(
            get_opts(),
            args(&["b.fdi", "-v", "a.fdi", "--output", "out.conf"]),
        );

        assert_eq!(
            Ok(Command::Convert {
                inputs: vec!["b.fdi".into(), "a.fdi".into()],
                output: Some("out.conf".into()),
                verbose: true,
            }),
            result
        );
    }

    #[test]
    fn parse_options_output_missing_argument() {
        let result = parse_options(get_opts(), args(&["a.fdi", "-o"]));

        match result {
            Err(Fail::ArgumentMissing(opt)) => assert_eq!("o", opt),
            _ => panic!("Missing output argument not caught"),
        }
    }

    #[test]
    fn exit_code_by_failure() {
        let not_found = || io::Error::new(io::ErrorKind::NotFound, "gone");

        assert_eq!(
            exitcode::NOINPUT,
            RunError::from(TranslateError::Read("a".into(), not_found()))
                .exit_code()
        );
        assert_eq!(
            exitcode::CANTCREAT,
            RunError::Create("out".into(), not_found()).exit_code()
        );
        assert_eq!(
            exitcode::DATAERR,
            RunError::from(TranslateError::Invalid(
                "a".into(),
                fdi2iclass::options::OptionError::UnexpectedTag("x".into())
            ))
            .exit_code()
        );
    }
}
