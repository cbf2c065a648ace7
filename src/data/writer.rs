use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Write one ID per line. Every line, including the last, ends in `\n`.
pub fn write_entity_ids<W, S>(mut writer: W, ids: &[S]) -> std::io::Result<()>
where
    W: Write,
    S: AsRef<str>,
{
    for id in ids {
        writeln!(writer, "{}", id.as_ref())?;
    }
    writer.flush()
}

/// Create (or truncate) `path` and write the IDs to it.
/// Returns the number of lines written.
pub fn write_scene_ids<S: AsRef<str>>(path: &Path, ids: &[S]) -> Result<usize> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_entity_ids(BufWriter::new(file), ids)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(ids.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_id_per_line_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene_ids.txt");

        let n = write_scene_ids(&path, &["A", "B", "C"]).unwrap();

        assert_eq!(n, 3);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "A\nB\nC\n");
    }

    #[test]
    fn empty_selection_gives_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene_ids.txt");
        std::fs::write(&path, "stale\n").unwrap();

        let n = write_scene_ids::<String>(&path, &[]).unwrap();

        assert_eq!(n, 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn writes_to_any_sink() {
        let mut buf = Vec::new();
        write_entity_ids(&mut buf, &[String::from("LC08_CU_003012")]).unwrap();
        assert_eq!(buf, b"LC08_CU_003012\n");
    }
}
