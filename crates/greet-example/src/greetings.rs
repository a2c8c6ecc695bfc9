//! Language files and greeting formatting.
//!
//! A language file holds one greeting per line as `hello:alternative`.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greeting {
    pub hello: String,
    pub alternative: String,
}

/// Reads every non-empty line of a language file.
pub fn load(path: &Path) -> Result<Vec<Greeting>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("cannot read language file {}", path.display()))?;

    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, line)| match line.split_once(':') {
            Some((hello, alternative)) => Ok(Greeting {
                hello: hello.trim().to_string(),
                alternative: alternative.trim().to_string(),
            }),
            None => bail!("line {} of {} has no ':'", index + 1, path.display()),
        })
        .collect()
}

/// Picks line `number`, counting from 1.
pub fn pick(greetings: &[Greeting], number: usize) -> Result<&Greeting> {
    number
        .checked_sub(1)
        .and_then(|index| greetings.get(index))
        .with_context(|| {
            format!(
                "line {} requested, language file has {}",
                number,
                greetings.len()
            )
        })
}

/// `Hello, John Smith!`
pub fn format(word: &str, first: &str, last: &str) -> String {
    let name = if last.is_empty() {
        first.to_string()
    } else {
        format!("{} {}", first, last)
    };
    format!("{}, {}!", word, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn language_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_lines() {
        let file = language_file("Hello:Hi\n\nGood morning : Morning\n");
        let greetings = load(file.path()).unwrap();
        assert_eq!(greetings.len(), 2);
        assert_eq!(greetings[1].hello, "Good morning");
        assert_eq!(greetings[1].alternative, "Morning");
    }

    #[test]
    fn rejects_lines_without_separator() {
        let file = language_file("Hello:Hi\nBonjour\n");
        let err = load(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("line 2 of"));
    }

    #[test]
    fn picks_from_one() {
        let file = language_file("Hello:Hi\nHowdy:Hey\n");
        let greetings = load(file.path()).unwrap();
        assert_eq!(pick(&greetings, 2).unwrap().hello, "Howdy");
        assert!(pick(&greetings, 0).is_err());
        assert!(pick(&greetings, 3).is_err());
    }

    #[test]
    fn formats_names() {
        assert_eq!(format("Hello", "John", ""), "Hello, John!");
        assert_eq!(format("Hi", "John", "Smith"), "Hi, John Smith!");
    }
}
