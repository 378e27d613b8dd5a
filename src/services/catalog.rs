use std::{
    collections::BTreeMap,
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::models::{Activity, CatalogStats, Category, TimeRange};

const COL_ACTIVITY: &str = "activity";
const COL_CATEGORY: &str = "category";
const COL_TAGS: &str = "tags";
const COL_MOOD: &str = "mood";
const COL_DURATION: &str = "time_minutes";

/// Error types for catalog loading
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("Failed to open catalog at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed catalog data: {0}")]
    Malformed(#[from] csv::Error),
    #[error("Catalog is missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("Row {row}: activity description is empty")]
    EmptyDescription { row: usize },
    #[error("Row {row}: duration '{value}' is not a positive number of minutes")]
    InvalidDuration { row: usize, value: String },
}

/// Column positions resolved from the header row
struct Columns {
    activity: usize,
    category: usize,
    tags: usize,
    mood: usize,
    duration: usize,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, CatalogLoadError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or(CatalogLoadError::MissingColumn(name))
        };

        Ok(Self {
            activity: find(COL_ACTIVITY)?,
            category: find(COL_CATEGORY)?,
            tags: find(COL_TAGS)?,
            mood: find(COL_MOOD)?,
            duration: find(COL_DURATION)?,
        })
    }
}

/// The fixed, read-only set of activities available for recommendation
///
/// Built once at startup and shared behind an `Arc`; there is no way to mutate
/// entries after loading.
#[derive(Debug, Clone, Default)]
pub struct ActivityCatalog {
    activities: Vec<Activity>,
}

impl ActivityCatalog {
    /// Loads the catalog from a CSV file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogLoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CatalogLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::from_reader(file)?;

        tracing::info!(
            path = %path.display(),
            activities = catalog.len(),
            "Loaded activity catalog"
        );

        Ok(catalog)
    }

    /// Parses catalog rows from any CSV source
    ///
    /// Requires the columns `activity`, `category`, `tags`, `mood` and
    /// `time_minutes` (any order, extra columns ignored). Tags are a delimited
    /// list inside a single field.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogLoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = Columns::resolve(reader.headers()?)?;

        let mut activities = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let row = index + 1;
            let field = |i: usize| record.get(i).unwrap_or_default();

            let description = field(columns.activity);
            if description.is_empty() {
                return Err(CatalogLoadError::EmptyDescription { row });
            }

            let raw_duration = field(columns.duration);
            let duration_minutes = raw_duration
                .parse::<u32>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .ok_or_else(|| CatalogLoadError::InvalidDuration {
                    row,
                    value: raw_duration.to_string(),
                })?;

            activities.push(Activity {
                id: row,
                description: description.to_string(),
                category: Category::from(field(columns.category)),
                tags: Activity::parse_tags(field(columns.tags)),
                mood: field(columns.mood).to_lowercase(),
                duration_minutes,
            });
        }

        Ok(Self { activities })
    }

    /// All activities in catalog order
    pub fn all(&self) -> &[Activity] {
        &self.activities
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Counts and duration statistics over the catalog
    pub fn stats(&self) -> CatalogStats {
        let mut categories = BTreeMap::new();
        let mut moods = BTreeMap::new();

        for activity in &self.activities {
            *categories
                .entry(activity.category.to_string())
                .or_insert(0) += 1;
            *moods.entry(activity.mood.clone()).or_insert(0) += 1;
        }

        let durations = self.activities.iter().map(|a| a.duration_minutes);
        let time_range = durations
            .clone()
            .min()
            .zip(durations.clone().max())
            .map(|(min, max)| TimeRange { min, max });

        let avg_time = if self.is_empty() {
            None
        } else {
            let total: u64 = durations.map(u64::from).sum();
            Some(total as f64 / self.len() as f64)
        };

        CatalogStats {
            total_activities: self.len(),
            categories,
            moods,
            avg_time,
            time_range,
        }
    }
}
