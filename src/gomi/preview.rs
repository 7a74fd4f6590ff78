use std::fs::{self, File, Metadata};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

const MAX_LINES: usize = 5;
const MAX_WIDTH: usize = 70;
const SNIFF_BYTES: u64 = 8 * 1024;

fn perm_string(bits: u32) -> String {
    format!(
        "{}{}{}",
        if bits & 4 != 0 { 'r' } else { '-' },
        if bits & 2 != 0 { 'w' } else { '-' },
        if bits & 1 != 0 { 'x' } else { '-' }
    )
}

fn kind_char(meta: &Metadata) -> char {
    let kind = meta.file_type();
    if kind.is_dir() {
        'd'
    } else if kind.is_symlink() {
        'l'
    } else {
        '-'
    }
}

#[cfg(unix)]
fn mode_string(meta: &Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;
    let mode = meta.permissions().mode();
    format!(
        "{}{}{}{}",
        kind_char(meta),
        perm_string((mode >> 6) & 0o7),
        perm_string((mode >> 3) & 0o7),
        perm_string(mode & 0o7)
    )
}

#[cfg(not(unix))]
fn mode_string(meta: &Metadata) -> String {
    let bits = if meta.permissions().readonly() { 4 } else { 6 };
    format!("{}{}", kind_char(meta), perm_string(bits).repeat(3))
}

fn fit(line: &str) -> String {
    let line = line.replace('\t', "  ");
    if line.chars().count() <= MAX_WIDTH {
        return line;
    }
    let cut = line.chars().take(MAX_WIDTH).collect::<String>();
    format!("{cut}...")
}

fn looks_binary(path: &Path) -> bool {
    let mut head = Vec::new();
    let read = File::open(path).and_then(|file| file.take(SNIFF_BYTES).read_to_end(&mut head));
    if read.is_err() {
        return true;
    }
    if head.contains(&0) {
        return true;
    }
    match std::str::from_utf8(&head) {
        Ok(_) => false,
        // A multi-byte character cut off by the sniff window is still text.
        Err(err) => err.error_len().is_some(),
    }
}

fn directory_lines(path: &Path) -> Vec<String> {
    let mut entries = fs::read_dir(path)
        .map(|iter| iter.filter_map(|entry| entry.ok()).collect::<Vec<_>>())
        .unwrap_or_default();
    entries.sort_by_key(|entry| entry.file_name());

    let mut lines = vec!["(directory)".to_string()];
    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        match entry.metadata() {
            Ok(meta) => lines.push(format!("{}\t{name}", mode_string(&meta))),
            Err(_) => lines.push(format!("?---------\t{name}")),
        }
    }
    lines
}

fn text_lines(path: &Path) -> Vec<String> {
    let Ok(file) = File::open(path) else {
        return Vec::new();
    };
    BufReader::new(file)
        .lines()
        .take(MAX_LINES + 1)
        .map_while(|line| line.ok())
        .collect()
}

/// Short preview of an archived entry for the restore prompt.
///
/// Text files show their first lines, directories list their entries with
/// a mode string, anything else is summarized in parentheses. Every line is
/// indented by two spaces and at most `MAX_LINES` lines are shown.
pub fn head(path: &Path) -> String {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(_) => return "  (not found)\n".to_string(),
    };

    let lines = if meta.is_dir() {
        directory_lines(path)
    } else if looks_binary(path) {
        return "  (binary file)\n".to_string();
    } else {
        text_lines(path)
    };
    if lines.is_empty() {
        return "  (no content)\n".to_string();
    }

    let mut out = String::new();
    for line in lines.iter().take(MAX_LINES) {
        out.push_str("  ");
        out.push_str(&fit(line));
        out.push('\n');
    }
    if lines.len() > MAX_LINES {
        out.push_str("  ...\n");
    }
    out
}
