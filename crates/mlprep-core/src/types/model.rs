//! Model data description.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Feature column selecting every non-target column.
pub const WILDCARD: &str = "*";

/// Learning task, which decides how labels are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    #[default]
    Classification,
    Regression,
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelType::Classification => write!(f, "classification"),
            ModelType::Regression => write!(f, "regression"),
        }
    }
}

/// Which columns become features.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "FeatureList", into = "FeatureList")]
pub enum FeatureSelection {
    /// Every column except the target, in file order
    #[default]
    All,
    /// Exactly these columns, in this order
    Named(Vec<String>),
}

/// Serialized form: `"*"`, a single name, or a list of names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum FeatureList {
    One(String),
    Many(Vec<String>),
}

impl TryFrom<FeatureList> for FeatureSelection {
    type Error = String;

    fn try_from(list: FeatureList) -> Result<Self, Self::Error> {
        let names = match list {
            FeatureList::One(name) => vec![name],
            FeatureList::Many(names) => names,
        };
        if names.is_empty() {
            return Err("feature list is empty".to_string());
        }
        let wildcards = names.iter().filter(|n| n.trim() == WILDCARD).count();
        match (wildcards, names.len()) {
            (0, _) => Ok(FeatureSelection::Named(names)),
            (1, 1) => Ok(FeatureSelection::All),
            _ => Err(format!(
                "wildcard {:?} cannot be mixed with column names",
                WILDCARD
            )),
        }
    }
}

impl From<FeatureSelection> for FeatureList {
    fn from(selection: FeatureSelection) -> Self {
        match selection {
            FeatureSelection::All => FeatureList::One(WILDCARD.to_string()),
            FeatureSelection::Named(names) => FeatureList::Many(names),
        }
    }
}

/// Where a model's data lives and how to read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSpec {
    /// Project directory; input files live in `<directory>/input`
    pub directory: PathBuf,
    /// File extension without the dot
    pub extension: String,
    pub features: FeatureSelection,
    pub model_type: ModelType,
    /// Single-byte field separator
    pub separator: String,
    /// Label column
    pub target: String,
    pub train_file: String,
    pub test_file: String,
    pub seed: u64,
    pub shuffle: bool,
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            extension: "csv".to_string(),
            features: FeatureSelection::All,
            model_type: ModelType::Classification,
            separator: ",".to_string(),
            target: "target".to_string(),
            train_file: "train".to_string(),
            test_file: "test".to_string(),
            seed: 42,
            shuffle: false,
        }
    }
}
