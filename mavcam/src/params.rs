//! Camera parameter definitions.
//!
//! Parameters map a name the GCS uses to a control on the camera device, and
//! declare how the control's value is encoded on the wire.
use crate::{
    protocol::message::{ParamExtType, PARAM_ID_LENGTH},
    Error, Result,
};
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fmt::Display,
    ops::RangeInclusive,
    path::{Path, PathBuf},
    str::FromStr,
};

/// Value type of a parameter.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "String")]
pub enum ParamType {
    Int32,
    Uint32,
    /// Boolean, stored as a byte.
    Bool,
}

impl ParamType {
    /// The type reported to the GCS.
    pub fn mav_type(self) -> ParamExtType {
        match self {
            Self::Int32 => ParamExtType::Int32,
            Self::Uint32 => ParamExtType::Uint32,
            Self::Bool => ParamExtType::Uint8,
        }
    }

    /// Values which can be represented by this type.
    pub fn range(self) -> RangeInclusive<i64> {
        match self {
            Self::Int32 => i64::from(i32::MIN)..=i64::from(i32::MAX),
            Self::Uint32 => 0..=i64::from(u32::MAX),
            Self::Bool => 0..=1,
        }
    }
}

impl FromStr for ParamType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "int32" => Ok(Self::Int32),
            "uint32" => Ok(Self::Uint32),
            "bool" => Ok(Self::Bool),
            _ => Err(Error::UnsupportedParameterType(s.to_string())),
        }
    }
}

impl TryFrom<String> for ParamType {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Int32 => "int32",
            Self::Uint32 => "uint32",
            Self::Bool => "bool",
        })
    }
}

/// A single camera parameter.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ParameterDefinition {
    /// Name of the parameter, at most 16 bytes.
    pub name: String,
    /// ID of the control on the camera device.
    pub device_id: u32,
    #[serde(rename = "type")]
    pub typ: ParamType,
    /// Initial value, for devices which don't remember their settings.
    #[serde(default)]
    pub default: Option<i64>,
}

impl ParameterDefinition {
    pub fn new(name: impl Into<String>, device_id: u32, typ: ParamType) -> Self {
        Self {
            name: name.into(),
            device_id,
            typ,
            default: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DefinitionDocument {
    #[serde(default, rename = "parameter")]
    parameters: Vec<ParameterDefinition>,
}

/// Parses a TOML parameter definition document.
///
/// ```toml
/// [[parameter]]
/// name = "brightness"
/// device_id = 0x00980900
/// type = "int32"
/// ```
///
/// ## Errors
///
/// * [`Error::Definition`] when the document is malformed, including when it
///   names an unsupported parameter type.
pub fn parse_definitions(doc: &str) -> Result<Vec<ParameterDefinition>> {
    let doc: DefinitionDocument = toml::from_str(doc)?;
    Ok(doc.parameters)
}

/// Somewhere to load [ParameterDefinition]s from.
pub trait ParameterSource: Send + Sync {
    fn load(&self) -> Result<Vec<ParameterDefinition>>;
}

/// Parameter definitions in a TOML file.
#[derive(Debug, Clone)]
pub struct TomlFile(PathBuf);

impl TomlFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self(path.as_ref().to_path_buf())
    }
}

impl ParameterSource for TomlFile {
    fn load(&self) -> Result<Vec<ParameterDefinition>> {
        debug!("loading parameter definitions from {}", self.0.display());
        let doc = std::fs::read_to_string(&self.0)?;
        parse_definitions(&doc)
    }
}

impl ParameterSource for Vec<ParameterDefinition> {
    fn load(&self) -> Result<Vec<ParameterDefinition>> {
        Ok(self.clone())
    }
}

/// Loaded [ParameterDefinition]s, keyed by name.
///
/// Iteration is in name order, which is also the order of parameter indexes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParameterTable {
    parameters: BTreeMap<String, ParameterDefinition>,
}

impl ParameterTable {
    /// Builds a table from definitions.
    ///
    /// ## Errors
    ///
    /// * [`Error::Config`] when a name is defined more than once, is empty, or
    ///   is longer than [`PARAM_ID_LENGTH`] bytes
    pub fn new(definitions: Vec<ParameterDefinition>) -> Result<Self> {
        let mut parameters = BTreeMap::new();
        for definition in definitions {
            if definition.name.is_empty() {
                return Err(Error::Config("parameter name must not be empty".to_string()));
            }
            if definition.name.len() > PARAM_ID_LENGTH {
                return Err(Error::Config(format!(
                    "parameter name {:?} is longer than {PARAM_ID_LENGTH} bytes",
                    definition.name
                )));
            }
            if parameters.contains_key(&definition.name) {
                return Err(Error::Config(format!(
                    "parameter {:?} is defined more than once",
                    definition.name
                )));
            }
            parameters.insert(definition.name.clone(), definition);
        }
        Ok(Self { parameters })
    }

    pub fn get(&self, name: &str) -> Option<&ParameterDefinition> {
        self.parameters.get(name)
    }

    /// Index of a parameter, as reported in `PARAM_EXT_VALUE`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.parameters.keys().position(|k| k == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterDefinition> {
        self.parameters.values()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

/// Loads a [ParameterTable] from a [ParameterSource] when it is first needed,
/// and keeps it.
pub struct ParameterStore {
    source: Box<dyn ParameterSource>,
    table: Option<ParameterTable>,
}

impl ParameterStore {
    pub fn new(source: impl ParameterSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            table: None,
        }
    }

    /// Gets the table, loading it on the first call.
    ///
    /// A failed load is not cached, and will be tried again on the next call.
    pub fn load_once(&mut self) -> Result<&ParameterTable> {
        if self.table.is_none() {
            let table = ParameterTable::new(self.source.load()?)?;
            info!("loaded {} parameter definition(s)", table.len());
            self.table = Some(table);
        }

        self.table.as_ref().ok_or(Error::Internal)
    }

    /// `true` if the table has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    /// Gets the table if it has already been loaded, without loading it.
    pub fn loaded(&self) -> Option<&ParameterTable> {
        self.table.as_ref()
    }
}
