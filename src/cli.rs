use std::ffi::OsString;
use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, ValueHint};

/// Long options, as spelled on the command line.
const LONG_FLAGS: [&str; 5] = ["editor", "suffix", "use-exact-path", "log-level", "log-file"];

/// Long options that consume the following argument when no `=` is given.
const VALUE_FLAGS: [&str; 4] = ["editor", "suffix", "log-level", "log-file"];

#[derive(Parser, Debug)]
#[command(
    name = "vipe",
    version = concat!(
        env!("CARGO_PKG_VERSION"), " - ",
        env!("VERGEN_GIT_DESCRIBE"), "(",
        env!("VERGEN_BUILD_DATE"), ")"
    ),
    about
)]
pub struct Cli {
    /// Path to editor to use
    #[arg(long, value_name = "EDITOR", allow_hyphen_values = true)]
    pub editor: Option<String>,

    /// File extension of the temporary file
    #[arg(long, value_name = "EXT", default_value = "")]
    pub suffix: String,

    /// Use exact editor path without any special path processing
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub use_exact_path: bool,

    /// Diagnostic log filter, e.g. `debug` or `vipe=trace`
    #[arg(long, value_name = "DIRECTIVE", env = "VIPE_LOG")]
    pub log_level: Option<String>,

    /// Diagnostic log destination
    #[arg(long, value_name = "PATH", env = "VIPE_LOG_FILE", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Everything from the first non-option argument on; accepted and unused
    #[arg(hide = true)]
    pub trailing: Vec<OsString>,
}

/// Rewrites single-dash long options (`-editor vim`, `-suffix=md`) into the
/// double-dash form understood by clap. Option parsing ends at `--` or at the
/// first non-option argument, before which a `--` is inserted; values and
/// everything after that are passed through untouched.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut iter = args.into_iter();
    let mut normalized: Vec<OsString> = iter.next().into_iter().collect();

    while let Some(arg) = iter.next() {
        let Some(text) = arg.to_str() else {
            normalized.push(OsString::from("--"));
            normalized.push(arg);
            normalized.extend(iter.by_ref());
            break;
        };
        if text == "--" {
            normalized.push(arg);
            normalized.extend(iter.by_ref());
            break;
        }

        let body = text.strip_prefix("--").or_else(|| text.strip_prefix('-'));
        let Some(body) = body.filter(|body| !body.is_empty()) else {
            normalized.push(OsString::from("--"));
            normalized.push(arg);
            normalized.extend(iter.by_ref());
            break;
        };
        let (name, inline_value) = match body.split_once('=') {
            Some((name, _)) => (name, true),
            None => (body, false),
        };
        if !LONG_FLAGS.contains(&name) {
            normalized.push(arg);
            continue;
        }

        normalized.push(OsString::from(format!("--{body}")));
        if !inline_value
            && VALUE_FLAGS.contains(&name)
            && let Some(value) = iter.next()
        {
            normalized.push(value);
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let args = std::iter::once("vipe").chain(args.iter().copied()).map(OsString::from);
        Cli::try_parse_from(normalize_args(args)).unwrap()
    }

    #[test]
    fn test_single_dash_long_flags() {
        let cli = parse(&["-editor", "nano -w", "-suffix", "md", "-use-exact-path"]);
        assert_eq!(cli.editor.as_deref(), Some("nano -w"));
        assert_eq!(cli.suffix, "md");
        assert!(cli.use_exact_path);
    }

    #[test]
    fn test_inline_values() {
        let cli = parse(&["-editor=vim", "--suffix=.txt", "-use-exact-path=false"]);
        assert_eq!(cli.editor.as_deref(), Some("vim"));
        assert_eq!(cli.suffix, ".txt");
        assert!(!cli.use_exact_path);
    }

    #[test]
    fn test_editor_presence_is_tracked() {
        assert_eq!(parse(&[]).editor, None);
        assert_eq!(parse(&["-editor", ""]).editor.as_deref(), Some(""));
    }

    #[test]
    fn test_flag_like_values_are_not_rewritten() {
        let cli = parse(&["-editor", "-suffix"]);
        assert_eq!(cli.editor.as_deref(), Some("-suffix"));
        assert_eq!(cli.suffix, "");
    }

    #[test]
    fn test_unknown_flags_are_rejected() {
        let args = ["vipe", "-frobnicate"].map(OsString::from);
        assert!(Cli::try_parse_from(normalize_args(args)).is_err());
    }

    #[test]
    fn test_options_end_at_first_positional() {
        let cli = parse(&["-suffix", "md", "notes.txt", "-editor", "nano", "-frobnicate"]);
        assert_eq!(cli.suffix, "md");
        assert_eq!(cli.editor, None);
        let trailing = ["notes.txt", "-editor", "nano", "-frobnicate"].map(OsString::from);
        assert_eq!(cli.trailing, trailing);

        let cli = parse(&["-", "-use-exact-path"]);
        assert!(!cli.use_exact_path);
        assert_eq!(cli.trailing, ["-", "-use-exact-path"].map(OsString::from));
    }

    #[test]
    fn test_normalize_stops_at_first_positional() {
        let args = ["vipe", "-editor", "vim", "file", "-suffix", "md"].map(OsString::from);
        let normalized = normalize_args(args);
        assert_eq!(
            normalized,
            ["vipe", "--editor", "vim", "--", "file", "-suffix", "md"].map(OsString::from)
        );
    }

    #[test]
    fn test_normalize_stops_at_double_dash() {
        let args = ["vipe", "-suffix", "md", "--", "-editor"].map(OsString::from);
        let normalized = normalize_args(args);
        assert_eq!(normalized, ["vipe", "--suffix", "md", "--", "-editor"].map(OsString::from));
    }
}
