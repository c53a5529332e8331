use std::path::PathBuf;
use thiserror::Error;

pub(crate) const USAGE: &str = "\
Usage: timed-snake [OPTIONS]

Play snake in the terminal, racing to eat food before it spoils

Options:
  -c, --config <PATH>   Read configuration from the given file
  -n, --name <NAME>     Record scores under the given player name
  -h, --help            Show this help and exit
  -V, --version         Show the program version and exit
";

/// What the command line asks the program to do
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum CliAction {
    Run(Arguments),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Arguments {
    pub(crate) config: Option<PathBuf>,
    pub(crate) name: Option<String>,
}

impl CliAction {
    pub(crate) fn from_env() -> Result<CliAction, CliError> {
        CliAction::from_parser(lexopt::Parser::from_env())
    }

    fn from_parser(mut parser: lexopt::Parser) -> Result<CliAction, CliError> {
        use lexopt::prelude::*;
        let mut args = Arguments::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Short('c') | Long("config") => {
                    args.config = Some(PathBuf::from(parser.value()?));
                }
                Short('n') | Long("name") => {
                    let name = parser.value()?.string()?;
                    let name = name.trim();
                    if name.is_empty() {
                        return Err(CliError::EmptyName);
                    }
                    args.name = Some(name.to_owned());
                }
                Short('h') | Long("help") => return Ok(CliAction::Help),
                Short('V') | Long("version") => return Ok(CliAction::Version),
                _ => return Err(arg.unexpected().into()),
            }
        }
        Ok(CliAction::Run(args))
    }
}

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Parse(#[from] lexopt::Error),
    #[error("player name must not be empty")]
    EmptyName,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Result<CliAction, CliError> {
        CliAction::from_parser(lexopt::Parser::from_args(args.iter().copied()))
    }

    #[test]
    fn no_args() {
        assert_eq!(
            parse(&[]).unwrap(),
            CliAction::Run(Arguments::default())
        );
    }

    #[rstest]
    #[case(&["-c", "my.toml"])]
    #[case(&["--config", "my.toml"])]
    #[case(&["--config=my.toml"])]
    #[case(&["-cmy.toml"])]
    fn config(#[case] args: &[&str]) {
        assert_eq!(
            parse(args).unwrap(),
            CliAction::Run(Arguments {
                config: Some(PathBuf::from("my.toml")),
                name: None,
            })
        );
    }

    #[test]
    fn name_and_config() {
        assert_eq!(
            parse(&["-n", " Ada ", "-c", "x.toml"]).unwrap(),
            CliAction::Run(Arguments {
                config: Some(PathBuf::from("x.toml")),
                name: Some(String::from("Ada")),
            })
        );
    }

    #[rstest]
    #[case(&["-h"], CliAction::Help)]
    #[case(&["--name", "x", "--help"], CliAction::Help)]
    #[case(&["-V"], CliAction::Version)]
    #[case(&["--version"], CliAction::Version)]
    fn info(#[case] args: &[&str], #[case] action: CliAction) {
        assert_eq!(parse(args).unwrap(), action);
    }

    #[test]
    fn empty_name() {
        assert!(matches!(parse(&["-n", "  "]), Err(CliError::EmptyName)));
    }

    #[rstest]
    #[case(&["--speed", "9"])]
    #[case(&["stray"])]
    #[case(&["--config"])]
    fn bad_args(#[case] args: &[&str]) {
        assert!(matches!(parse(args), Err(CliError::Parse(_))));
    }
}
