use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};

pub fn read_json<T>(path: &Path) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("cannot parse {}", path.display()))
}

/// Pretty JSON to `path`, or to stdout when absent.
pub fn write_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize,
{
    match path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, value)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_write_then_read() {
        let path = std::env::temp_dir()
            .join(format!("ruta-cli-{}", std::process::id()))
            .join("values.json");
        let values = BTreeMap::from([("a", 1), ("b", 2)]);

        write_json(&values, Some(&path)).unwrap();
        let read: BTreeMap<String, i32> = read_json(&path).unwrap();

        assert_eq!(read.get("b"), Some(&2));
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_read_missing_file() {
        let error = read_json::<serde_json::Value>(Path::new("/nonexistent/plan.json")).unwrap_err();
        assert!(error.to_string().contains("cannot open"));
    }
}
