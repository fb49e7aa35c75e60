//! Interactive data-file picker (`--pick`).
//!
//! Lists `*.csv` files under the current directory, shows whether each
//! header resolves to the four column roles, and lets the user choose one by
//! number or type a path. Files whose header does not resolve are listed but
//! cannot be chosen by number.

use std::fs::{self, File};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::analytics::schema::resolve_roles;
use crate::error::{AppError, PipelineError};

const SEARCH_DEPTH: usize = 3;

/// A discovered CSV with the result of resolving its header.
#[derive(Debug)]
pub struct Candidate {
    pub path: PathBuf,
    pub status: Result<(), String>,
}

/// Prompt on stdin/stdout for a data file.
pub fn prompt_for_data_path() -> Result<PathBuf, AppError> {
    let candidates: Vec<Candidate> = discover_csv_files(Path::new("."))
        .into_iter()
        .map(|path| {
            let status = inspect_header(&path).map_err(|e| e.to_string());
            Candidate { path, status }
        })
        .collect();

    if candidates.is_empty() {
        return Err(AppError::new(
            2,
            "No .csv files found. Pass one with `dash -f <sales.csv>`.",
        ));
    }

    println!("Found {} CSV file(s):", candidates.len());
    for (idx, c) in candidates.iter().enumerate() {
        let status = match &c.status {
            Ok(()) => "ok".to_string(),
            Err(reason) => format!("unusable: {reason}"),
        };
        println!("{:>3}) {}  [{status}]", idx + 1, pretty_path(&c.path));
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("Select a file (1-{}), type a path, or q to quit: ", candidates.len());
        io::stdout()
            .flush()
            .map_err(|e| AppError::new(2, format!("Failed to write prompt: {e}")))?;

        let Some(line) = lines.next() else {
            return Err(AppError::new(2, "No input received. Pass a CSV with `dash -f <sales.csv>`."));
        };
        let line = line.map_err(|e| AppError::new(2, format!("Failed to read input: {e}")))?;
        let input = line.trim();

        if input.eq_ignore_ascii_case("q") {
            return Err(AppError::new(2, "Canceled."));
        }

        if let Ok(choice) = input.parse::<usize>() {
            match candidates.get(choice.wrapping_sub(1)) {
                Some(Candidate { path, status: Ok(()) }) => return Ok(path.clone()),
                Some(Candidate { status: Err(reason), .. }) => println!("Cannot use that file: {reason}"),
                None => println!("Invalid choice: {choice}."),
            }
            continue;
        }

        let path = PathBuf::from(input);
        match inspect_header(&path) {
            Ok(()) => return Ok(path),
            Err(err) => println!("{err}"),
        }
    }
}

/// Check that `path` opens and its header resolves every role.
pub fn inspect_header(path: &Path) -> Result<(), PipelineError> {
    let file = File::open(path).map_err(|source| PipelineError::MissingInput {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    resolve_roles(&header).map(|_| ())
}

/// `*.csv` files under `root`, sorted by display path.
pub fn discover_csv_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    walk(root, 0, &mut out);
    out.sort_by_key(|p| pretty_path(p));
    out
}

fn walk(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    if depth > SEARCH_DEPTH {
        return;
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
            if !matches!(name, ".git" | "target" | "node_modules") {
                walk(&path, depth + 1, out);
            }
        } else if file_type.is_file() && is_csv(&path) {
            out.push(path);
        }
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn pretty_path(path: &Path) -> String {
    path.strip_prefix("./").unwrap_or(path).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    #[test]
    fn discovers_and_inspects() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("good.csv"), "Date,Sales,Region,Product\n").unwrap();
        fs::write(dir.path().join("nested/bad.CSV"), "Date,Region,Product\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a csv").unwrap();

        let files = discover_csv_files(dir.path());
        assert_eq!(files.len(), 2);

        assert!(inspect_header(&dir.path().join("good.csv")).is_ok());
        assert!(matches!(
            inspect_header(&dir.path().join("nested/bad.CSV")),
            Err(PipelineError::AmbiguousSchema { .. })
        ));
    }
}
