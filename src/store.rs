/// High-score persistence: a tiny key-value store.
///
/// ## File format:
///   One `KEY=value` line per entry in `scores.dat`. Unknown or malformed
///   lines are preserved on write and ignored on read.
///
/// The store is deliberately forgiving: a missing or unreadable file reads
/// as "no score yet", and write failures are swallowed. Losing a high score
/// must never abort a round.

use std::path::PathBuf;

pub trait HighscoreStore {
    /// Stored value for `key`, or `None` when absent or unreadable.
    fn get(&self, key: &str) -> Option<u32>;
    /// Persist `value` under `key`. Failures are silent.
    fn set(&mut self, key: &str, value: u32);
}

// ── File-backed store ──

const SCORES_FILE: &str = "scores.dat";

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new() -> Self {
        FileStore { path: save_dir().join(SCORES_FILE) }
    }

    /// Store backed by an explicit path. Used by tests and portable installs.
    #[allow(dead_code)]
    pub fn at(path: PathBuf) -> Self {
        FileStore { path }
    }
}

impl HighscoreStore for FileStore {
    fn get(&self, key: &str) -> Option<u32> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        lookup(&content, key)
    }

    fn set(&mut self, key: &str, value: u32) {
        let existing = std::fs::read_to_string(&self.path).unwrap_or_default();
        let content = upsert(&existing, key, value);
        let _ = std::fs::write(&self.path, content);
    }
}

fn lookup(content: &str, key: &str) -> Option<u32> {
    content.lines().find_map(|line| {
        let (k, v) = line.split_once('=')?;
        if k.trim() == key {
            v.trim().parse().ok()
        } else {
            None
        }
    })
}

/// Replace `key`'s line, or append it, keeping every other line intact.
fn upsert(content: &str, key: &str, value: u32) -> String {
    let mut out = String::with_capacity(content.len() + 32);
    let mut written = false;

    for line in content.lines() {
        let matches = line
            .split_once('=')
            .map(|(k, _)| k.trim() == key)
            .unwrap_or(false);
        if matches {
            if !written {
                out.push_str(&format!("{}={}\n", key, value));
                written = true;
            }
        } else if !line.trim().is_empty() {
            out.push_str(line);
            out.push('\n');
        }
    }

    if !written {
        out.push_str(&format!("{}={}\n", key, value));
    }

    out
}

/// Directory for persistent data.
/// Prefers the exe directory when writable (portable installs), then the
/// XDG data home, then the CWD.
fn save_dir() -> PathBuf {
    // 1. Try exe directory
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            // Check if writable (system installs like /usr/games/ won't be)
            let test_path = parent.join(".write_test_huehunt");
            if std::fs::write(&test_path, "").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return parent.to_path_buf();
            }
        }
    }

    // 2. XDG data home (~/.local/share/huehunt) for system installs
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/huehunt");
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    // 3. Fallback to CWD
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> FileStore {
        let path = std::env::temp_dir().join(format!(
            "huehunt_test_{}_{}.dat",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        FileStore::at(path)
    }

    #[test]
    fn absent_file_reads_as_none() {
        let store = temp_store("absent");
        assert_eq!(store.get("HUEHUNT_HIGHSCORE"), None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut store = temp_store("roundtrip");
        store.set("HUEHUNT_HIGHSCORE", 12);
        assert_eq!(store.get("HUEHUNT_HIGHSCORE"), Some(12));

        store.set("HUEHUNT_HIGHSCORE", 15);
        assert_eq!(store.get("HUEHUNT_HIGHSCORE"), Some(15));
        let _ = std::fs::remove_file(&store.path);
    }

    #[test]
    fn unrelated_keys_survive_updates() {
        let mut store = temp_store("unrelated");
        store.set("OTHER_KEY", 4);
        store.set("HUEHUNT_HIGHSCORE", 9);
        store.set("HUEHUNT_HIGHSCORE", 11);
        assert_eq!(store.get("OTHER_KEY"), Some(4));
        assert_eq!(store.get("HUEHUNT_HIGHSCORE"), Some(11));
        let _ = std::fs::remove_file(&store.path);
    }

    #[test]
    fn malformed_lines_are_ignored() {
        assert_eq!(lookup("garbage\nHS=abc", "HS"), None);
        // A later well-formed line still counts.
        assert_eq!(lookup("noise\nHS=abc\nHS=7", "HS"), Some(7));
    }

    #[test]
    fn upsert_deduplicates_the_key() {
        let content = "HS=3\nHS=5\nOTHER=1\n";
        let updated = upsert(content, "HS", 9);
        assert_eq!(updated.matches("HS=").count(), 1);
        assert_eq!(lookup(&updated, "HS"), Some(9));
        assert_eq!(lookup(&updated, "OTHER"), Some(1));
    }
}
