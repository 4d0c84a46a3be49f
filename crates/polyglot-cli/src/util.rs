use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use polyglot_core::Example;

/// Where a command writes its results: the `--output` file if one was given,
/// stdout otherwise.
pub struct Output {
    writer: Box<dyn Write>,
    target: String,
}

impl Output {
    /// Writes `value` as pretty JSON to `output_path`, or stdout if `None`.
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize + ?Sized,
    {
        Output::from_output_path(output_path)?.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        output_path.map_or_else(|| Ok(Output::stdout()), Output::create)
    }

    pub fn stdout() -> Self {
        Output {
            writer: Box::new(io::stdout().lock()),
            target: "<stdout>".to_owned(),
        }
    }

    pub fn create(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output {
            writer: Box::new(BufWriter::new(file)),
            target: path.display().to_string(),
        })
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize + ?Sized,
    {
        serde_json::to_writer_pretty(&mut self.writer, value)
            .with_context(|| format!("Failed to write JSON to {}", self.target))?;
        self.write_line("")
    }

    /// Writes one line of text and flushes.
    pub fn write_line(&mut self, line: &str) -> anyhow::Result<()> {
        writeln!(self.writer, "{line}")
            .and_then(|()| self.writer.flush())
            .with_context(|| format!("Failed to write to {}", self.target))
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Reads examples from a labeled example file.
///
/// Each non-blank line is `Label|phrase`, or a bare phrase for an unlabeled
/// example.
pub fn read_examples_file<P>(path: P) -> anyhow::Result<Vec<Example>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open examples file: {}", path.display()))?;
    parse_examples(BufReader::new(file))
        .with_context(|| format!("Failed to read examples file: {}", path.display()))
}

fn parse_examples<R>(reader: R) -> anyhow::Result<Vec<Example>>
where
    R: io::BufRead,
{
    let mut examples = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let example =
            Example::parse_line(&line).with_context(|| format!("Invalid line {}", index + 1))?;
        examples.push(example);
    }
    Ok(examples)
}

#[cfg(test)]
mod tests {
    use polyglot_core::Language;

    use super::*;

    #[test]
    fn test_parse_examples_skips_blank_lines() {
        let text = "English|Good morning\n\n  \nGerman|Guten Morgen\nno label\n";
        let examples = parse_examples(text.as_bytes()).unwrap();
        assert_eq!(examples.len(), 3);
        assert_eq!(examples[0].language(), Some(Language::English));
        assert_eq!(examples[1].language(), Some(Language::German));
        assert_eq!(examples[2].language(), None);
    }

    #[test]
    fn test_parse_examples_reports_line() {
        let text = "English|hello\nKlingon|nuqneH\n";
        let error = parse_examples(text.as_bytes()).unwrap_err();
        assert_eq!(error.to_string(), "Invalid line 2");
    }

    #[test]
    fn test_read_examples_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("examples.txt");
        std::fs::write(&path, "Danish|god morgen\nDutch|goedemorgen\n").unwrap();
        let examples = read_examples_file(&path).unwrap();
        assert_eq!(examples.len(), 2);
        assert!(read_examples_file(dir.path().join("missing.txt")).is_err());
    }

    #[test]
    fn test_save_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        Output::save_json(&["a", "b"], Some(path.clone())).unwrap();
        let values: Vec<String> = read_json_file("test", &path).unwrap();
        assert_eq!(values, ["a", "b"]);
        assert!(std::fs::read_to_string(&path).unwrap().ends_with("]\n"));
    }
}
