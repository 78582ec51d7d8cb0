//! Rewrites shorthand arguments into the form clap understands.
//!
//! - `-group` and `-file` become `--group` and `--file`.
//! - A caret suffix on `last`, `yd`, `lw`, `ins` or `cat` becomes a count:
//!   each `^` adds one to the default of 1, so `yd^^` is `yd 3`. A count
//!   given explicitly on the command line wins.

use std::ffi::OsString;
use std::sync::LazyLock;

use regex::Regex;

static CARET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(last|yd|lw|ins|cat)(\^+)$").unwrap());

/// Flags whose value is the following argument.
const VALUE_FLAGS: [&str; 4] = ["-f", "--file", "-c", "--config"];

/// Expands shorthand in a full argument list (program name first).
pub fn expand<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    for arg in args.iter_mut().skip(1) {
        match arg.to_str() {
            Some("-group") => *arg = OsString::from("--group"),
            Some("-file") => *arg = OsString::from("--file"),
            _ => {}
        }
    }

    let positions = positionals(&args);
    let Some(&idx) = positions.first() else {
        return args;
    };
    let Some((command, carets)) = args[idx].to_str().and_then(split_carets) else {
        return args;
    };

    let explicit_count = positions[1..]
        .iter()
        .filter_map(|&pos| args[pos].to_str())
        .any(|arg| arg.parse::<u32>().is_ok());

    tracing::debug!(%command, carets, explicit_count, "expanding caret shorthand");
    args[idx] = OsString::from(command);
    if !explicit_count {
        args.insert(idx + 1, OsString::from((1 + carets).to_string()));
    }
    args
}

/// Splits `yd^^` into `("yd", 2)`.
fn split_carets(arg: &str) -> Option<(String, usize)> {
    let caps = CARET_RE.captures(arg)?;
    Some((caps[1].to_string(), caps[2].len()))
}

/// Indices of positional arguments, skipping flags and their values.
/// Scanning stops at the first argument that is not UTF-8.
fn positionals(args: &[OsString]) -> Vec<usize> {
    let mut found = Vec::new();
    let mut skip_value = false;
    for (idx, arg) in args.iter().enumerate().skip(1) {
        if skip_value {
            skip_value = false;
            continue;
        }
        let Some(arg) = arg.to_str() else {
            break;
        };
        if VALUE_FLAGS.contains(&arg) {
            skip_value = true;
        } else if !arg.starts_with('-') {
            found.push(idx);
        }
    }
    found
}
