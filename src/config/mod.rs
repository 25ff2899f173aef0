// src/config/mod.rs
pub mod filters;

pub use filters::{City, Day, FilterSelection, Month};

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Env var naming a YAML catalog file.
pub const CATALOG_ENV: &str = "BIKESHARE_CATALOG";
/// Env var overriding the directory relative paths resolve against.
pub const DATA_DIR_ENV: &str = "BIKESHARE_DATA_DIR";

/// On-disk shape of a catalog file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    data_dir: Option<PathBuf>,
    #[serde(default)]
    cities: BTreeMap<City, PathBuf>,
}

/// Immutable mapping from city to the CSV holding its trips.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CityCatalog {
    files: BTreeMap<City, PathBuf>,
}

impl Default for CityCatalog {
    fn default() -> Self {
        Self::with_data_dir(".")
    }
}

impl CityCatalog {
    /// Default file names for every city, placed under `data_dir`.
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        let files = City::ALL
            .into_iter()
            .map(|c| (c, data_dir.join(c.default_file())))
            .collect();
        Self { files }
    }

    /// Parse a YAML catalog. Cities it omits keep their default file names.
    pub fn from_yaml(yaml: &str, default_data_dir: &Path) -> Result<Self> {
        let file: CatalogFile = if yaml.trim().is_empty() {
            CatalogFile::default()
        } else {
            serde_yaml::from_str(yaml).context("parsing city catalog")?
        };
        let data_dir = file
            .data_dir
            .unwrap_or_else(|| default_data_dir.to_path_buf());

        let mut catalog = Self::with_data_dir(&data_dir);
        for (city, path) in file.cities {
            let resolved = if path.is_absolute() {
                path
            } else {
                data_dir.join(path)
            };
            catalog.files.insert(city, resolved);
        }
        Ok(catalog)
    }

    /// Read the catalog at `path`.
    pub fn load(path: &Path, default_data_dir: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading city catalog {}", path.display()))?;
        Self::from_yaml(&text, default_data_dir)
            .with_context(|| format!("invalid city catalog {}", path.display()))
    }

    /// Build the catalog from `BIKESHARE_CATALOG` / `BIKESHARE_DATA_DIR`, falling back
    /// to the default file names in the working directory.
    pub fn from_env() -> Result<Self> {
        let data_dir = env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let catalog = match env::var_os(CATALOG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                info!(catalog = %path.display(), "loading city catalog");
                Self::load(&path, &data_dir)?
            }
            None => Self::with_data_dir(&data_dir),
        };
        for (city, path) in catalog.iter() {
            debug!(%city, path = %path.display(), "catalog entry");
        }
        Ok(catalog)
    }

    /// Source file for `city`. Every city is always present.
    pub fn path(&self, city: City) -> &Path {
        self.files
            .get(&city)
            .map(PathBuf::as_path)
            .unwrap_or_else(|| Path::new(city.default_file()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (City, &Path)> {
        self.files.iter().map(|(c, p)| (*c, p.as_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_cover_every_city() {
        let cat = CityCatalog::with_data_dir("/data");
        assert_eq!(cat.iter().count(), 3);
        assert_eq!(
            cat.path(City::NewYorkCity),
            Path::new("/data/new_york_city.csv")
        );
    }

    #[test]
    fn yaml_overrides_some_cities() -> Result<()> {
        let yaml = r#"
data_dir: /srv/trips
cities:
  chicago: chi_2017.csv
  washington: /abs/dc.csv
"#;
        let cat = CityCatalog::from_yaml(yaml, Path::new("."))?;
        assert_eq!(cat.path(City::Chicago), Path::new("/srv/trips/chi_2017.csv"));
        assert_eq!(cat.path(City::Washington), Path::new("/abs/dc.csv"));
        assert_eq!(
            cat.path(City::NewYorkCity),
            Path::new("/srv/trips/new_york_city.csv")
        );
        Ok(())
    }

    #[test]
    fn yaml_rejects_unknown_city() {
        let yaml = "cities:\n  boston: boston.csv\n";
        assert!(CityCatalog::from_yaml(yaml, Path::new(".")).is_err());
    }

    #[test]
    fn load_reads_file() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "cities:\n  new york city: nyc.csv")?;
        let cat = CityCatalog::load(tmp.path(), Path::new("base"))?;
        assert_eq!(cat.path(City::NewYorkCity), Path::new("base/nyc.csv"));
        assert_eq!(cat.path(City::Chicago), Path::new("base/chicago.csv"));
        Ok(())
    }

    #[test]
    fn empty_yaml_is_defaults() -> Result<()> {
        let cat = CityCatalog::from_yaml("", Path::new("d"))?;
        assert_eq!(cat, CityCatalog::with_data_dir("d"));
        Ok(())
    }
}
