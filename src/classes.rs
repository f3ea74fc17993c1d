//! Class label registry.
//!
//! A [`ClassMap`] is the fixed, externally supplied mapping from textual
//! labels to integer class ids used for one conversion run. It is loaded
//! once and passed by reference; unknown labels resolve to `None` so the
//! converter can skip the offending shape without aborting the document.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::LabelprepError;

/// A non-negative integer class identifier in the label text format.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(pub u32);

impl ClassId {
    /// Creates a new ClassId.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the underlying u32 value.
    #[inline]
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mapping from class label strings to class ids. Lookup is O(1).
#[derive(Clone, Debug, Default)]
pub struct ClassMap {
    ids_by_label: HashMap<String, u32>,
}

impl ClassMap {
    /// Creates an empty class map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a class map from (label, id) pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        Self {
            ids_by_label: pairs
                .into_iter()
                .map(|(label, id)| (label.into(), id))
                .collect(),
        }
    }

    /// Looks up the class id for a label. `None` means the label is
    /// unknown and the caller should skip the shape and report it.
    pub fn resolve(&self, label: &str) -> Option<ClassId> {
        self.ids_by_label.get(label).copied().map(ClassId)
    }

    /// Returns the number of labels in the map.
    pub fn len(&self) -> usize {
        self.ids_by_label.len()
    }

    /// Returns true if the map contains no labels.
    pub fn is_empty(&self) -> bool {
        self.ids_by_label.is_empty()
    }

    /// Loads a class map, dispatching on the file extension.
    ///
    /// `.json` files must contain an object mapping labels to ids
    /// (`{"Hand_Raised": 0}`); `.yaml`/`.yml` files are read as an
    /// Ultralytics `data.yaml` whose `names:` section supplies the labels.
    pub fn load(path: &Path) -> Result<Self, LabelprepError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        match ext.to_ascii_lowercase().as_str() {
            "json" => Self::from_json_file(path),
            "yaml" | "yml" => Self::from_data_yaml(path),
            other => Err(LabelprepError::ClassMapInvalid {
                path: path.to_path_buf(),
                message: format!("unsupported extension '{}' (expected json, yaml or yml)", other),
            }),
        }
    }

    /// Reads a JSON object mapping label strings to non-negative ids.
    pub fn from_json_file(path: &Path) -> Result<Self, LabelprepError> {
        let data = fs::read_to_string(path).map_err(LabelprepError::Io)?;
        let ids_by_label: HashMap<String, u32> =
            serde_json::from_str(&data).map_err(|source| LabelprepError::ClassMapParse {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self { ids_by_label })
    }

    /// Reads class names from an Ultralytics `data.yaml`.
    ///
    /// The `names:` section may be a sequence (index is the id) or an
    /// explicit index-to-name mapping; gaps in a mapping are backfilled
    /// with `class_<i>` placeholder labels.
    pub fn from_data_yaml(path: &Path) -> Result<Self, LabelprepError> {
        let data = fs::read_to_string(path).map_err(LabelprepError::Io)?;
        let parsed: DataYaml =
            serde_yaml::from_str(&data).map_err(|source| LabelprepError::ClassMapYamlParse {
                path: path.to_path_buf(),
                source,
            })?;

        let names = match parsed.names {
            DataYamlNames::Sequence(names) => names,
            DataYamlNames::Mapping(mapping) => {
                if mapping.is_empty() {
                    Vec::new()
                } else {
                    let max_index = *mapping.keys().max().expect("checked non-empty");
                    let mut names = vec![String::new(); max_index + 1];
                    for (index, name) in mapping {
                        names[index] = name;
                    }
                    for (index, name) in names.iter_mut().enumerate() {
                        if name.trim().is_empty() {
                            *name = format!("class_{}", index);
                        }
                    }
                    names
                }
            }
        };

        Ok(Self::from_pairs(
            names
                .into_iter()
                .enumerate()
                .map(|(index, name)| (name, index as u32)),
        ))
    }
}

#[derive(Debug, Deserialize)]
struct DataYaml {
    names: DataYamlNames,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DataYamlNames {
    Sequence(Vec<String>),
    Mapping(BTreeMap<usize, String>),
}
