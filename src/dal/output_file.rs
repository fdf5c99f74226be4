use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;

use crate::configuration::OutputSettings;

/// The configured fixed file name, or `<prefix>-<YYYY-MM-DD>.<ext>`.
pub fn output_path(settings: &OutputSettings, date: NaiveDate) -> PathBuf {
    let file_name = match &settings.file_name {
        Some(name) => name.clone(),
        None => format!(
            "{}-{}.{}",
            settings.file_prefix,
            date.format("%Y-%m-%d"),
            settings.format.extension()
        ),
    };

    PathBuf::from(&settings.directory).join(file_name)
}

/// Replaces the file at `path` with `contents`.
pub fn write_output(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use chrono::NaiveDate;

    use crate::configuration::{OutputFormat, OutputSettings};

    use super::{output_path, write_output};

    fn settings(file_name: Option<&str>, format: OutputFormat) -> OutputSettings {
        OutputSettings {
            directory: "out".to_string(),
            file_prefix: "abc-directory".to_string(),
            file_name: file_name.map(|n| n.to_string()),
            format,
        }
    }

    #[test]
    fn dated_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();

        assert_eq!(
            output_path(&settings(None, OutputFormat::Csv), date),
            PathBuf::from("out").join("abc-directory-2026-03-07.csv")
        );
        assert_eq!(
            output_path(&settings(None, OutputFormat::Json), date),
            PathBuf::from("out").join("abc-directory-2026-03-07.json")
        );
    }

    #[test]
    fn fixed_file_name_wins() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();

        assert_eq!(
            output_path(
                &settings(Some("abc-directory-test.csv"), OutputFormat::Csv),
                date
            ),
            PathBuf::from("out").join("abc-directory-test.csv")
        );
    }

    #[test]
    fn write_output_overwrites() {
        let path = std::env::temp_dir()
            .join(format!("abc-directory-{}", std::process::id()))
            .join("overwrite.csv");

        write_output(&path, "first\nsecond").unwrap();
        write_output(&path, "third").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "third");
        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }
}
