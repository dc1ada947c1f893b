/// Level loading. One level ships embedded so the binary runs with no data
/// files; a custom map can be pointed to from the config. File loading is
/// non-fatal: any failure warns and falls back to the embedded level.

use std::fs;
use std::path::Path;

/// The built-in map, 24 columns by 16 rows of 32px tiles (768x512 world).
const EMBEDDED_MAP: &str = "\
########################
#......................#
#......................#
#......P...............#
#......................#
#.......#..............#
#..........##...M......#
#.............###......#
####...................#
##.....................#
##.....................#
##.....................#
##.....................#
##.............i.......#
########################
########################";

const EMBEDDED_NAME: &str = "workshop";

#[derive(Clone, Debug)]
pub struct Level {
    pub name: String,
    pub rows: Vec<String>,
}

impl Level {
    pub fn embedded() -> Level {
        Level {
            name: EMBEDDED_NAME.to_string(),
            rows: EMBEDDED_MAP.lines().map(str::to_string).collect(),
        }
    }

    /// Parse a level file. Lines starting with ';' are comments; blank
    /// lines are skipped. Everything else is a map row. The level name is
    /// the file stem.
    pub fn from_file(path: &Path) -> Result<Level, String> {
        let text = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
        let rows: Vec<String> = text
            .lines()
            .filter(|l| !l.trim().is_empty() && !l.trim_start().starts_with(';'))
            .map(str::to_string)
            .collect();
        if rows.is_empty() {
            return Err(format!("{}: level file has no map rows", path.display()));
        }
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("level")
            .to_string();
        Ok(Level { name, rows })
    }

    pub fn row_strs(&self) -> Vec<&str> {
        self.rows.iter().map(String::as_str).collect()
    }
}

/// Level pointed to by the config, or the embedded one. A broken file is
/// a warning, never a crash.
pub fn load(path: Option<&Path>) -> Level {
    match path {
        Some(p) => match Level::from_file(p) {
            Ok(level) => level,
            Err(e) => {
                eprintln!("Warning: could not load level ({e}), using built-in level");
                Level::embedded()
            }
        },
        None => Level::embedded(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn embedded_level_has_expected_shape() {
        let level = Level::embedded();
        assert_eq!(level.rows.len(), 16);
        assert!(level.rows.iter().all(|r| r.len() == 24));
        // One spawn, one crate, one prop
        let all: String = level.rows.concat();
        assert_eq!(all.matches('P').count(), 1);
        assert_eq!(all.matches('M').count(), 1);
        assert_eq!(all.matches('i').count(), 1);
    }

    #[test]
    fn file_parse_skips_comments_and_blanks() {
        let dir = std::env::temp_dir();
        let path = dir.join("crateshift_level_test.lvl");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "; test map").unwrap();
        writeln!(f, "####").unwrap();
        writeln!(f).unwrap();
        writeln!(f, "#P.#").unwrap();
        drop(f);

        let level = Level::from_file(&path).unwrap();
        assert_eq!(level.rows, vec!["####", "#P.#"]);
        assert_eq!(level.name, "crateshift_level_test");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn empty_file_is_an_error() {
        let path = std::env::temp_dir().join("crateshift_empty_test.lvl");
        std::fs::write(&path, "; nothing here\n\n").unwrap();
        assert!(Level::from_file(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_falls_back_to_embedded() {
        let level = load(Some(Path::new("/nonexistent/map.lvl")));
        assert_eq!(level.name, EMBEDDED_NAME);
    }
}
