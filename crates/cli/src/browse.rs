//! Interactive file picker used when no path is given on the command line.
//!
//! Deliberately decoupled from the upload protocol: an explicit iterative
//! loop over "current directory, list entries, read a selection" that
//! returns a path (or nothing on cancel) and touches no network state.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// One entry of the currently browsed directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
}

/// What the user asked for on a given prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Choice {
    Quit,
    Up,
    Select(usize),
    Invalid,
}

/// List directory entries, directories first, each group sorted by name.
pub fn list_entries(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        entries.push(Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: entry.file_type()?.is_dir(),
        });
    }
    entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
    Ok(entries)
}

fn interpret_choice(input: &str, entry_count: usize) -> Choice {
    let input = input.trim();
    if input.eq_ignore_ascii_case("q") {
        return Choice::Quit;
    }
    if input == ".." {
        return Choice::Up;
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=entry_count).contains(&n) => Choice::Select(n - 1),
        _ => Choice::Invalid,
    }
}

/// Browse from `start` until the user selects a file or cancels.
pub fn pick_file(start: &Path) -> io::Result<Option<PathBuf>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut current = start.to_path_buf();

    loop {
        let entries = list_entries(&current)?;

        println!("\nCurrent directory: {}", current.display());
        println!("\nContents:");
        for (i, entry) in entries.iter().enumerate() {
            let marker = if entry.is_dir { "d" } else { " " };
            println!("{:>3}. [{marker}] {}", i + 1, entry.name);
        }
        println!("\nEnter a number to select, \"..\" to go up, or \"q\" to quit.");
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            // stdin closed; treat like quit
            return Ok(None);
        };

        match interpret_choice(&line?, entries.len()) {
            Choice::Quit => return Ok(None),
            Choice::Up => {
                if let Some(parent) = current.parent() {
                    current = parent.to_path_buf();
                }
            }
            Choice::Select(index) => {
                let entry = &entries[index];
                let path = current.join(&entry.name);
                if entry.is_dir {
                    current = path;
                } else {
                    return Ok(Some(path));
                }
            }
            Choice::Invalid => println!("Invalid choice."),
        }
    }
}
