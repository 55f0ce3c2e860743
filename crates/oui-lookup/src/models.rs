use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// IEEE allocation size of an assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockType {
    /// MA-L, 24-bit OUI
    #[default]
    MaL,
    /// MA-M, 28-bit prefix
    MaM,
    /// MA-S, 36-bit prefix
    MaS,
}

impl BlockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MaL => "MA-L",
            Self::MaM => "MA-M",
            Self::MaS => "MA-S",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MA-L" => Ok(Self::MaL),
            "MA-M" => Ok(Self::MaM),
            "MA-S" => Ok(Self::MaS),
            other => Err(format!("unknown block type {:?}", other)),
        }
    }
}

/// A resolved vendor entry.
///
/// `raw_data` mirrors the seven canonical fields as strings, plus any
/// extra field found in the source JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "DecodedRecord")]
pub struct VendorRecord {
    prefix: String,
    company_name: String,
    company_address: String,
    country_code: String,
    block_type: BlockType,
    updated: String,
    is_private: bool,
    raw_data: BTreeMap<String, String>,
}

impl VendorRecord {
    /// Record synthesized from a registry header: only the company name is
    /// known.
    pub fn from_vendor_name(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Self::build(
            prefix.into(),
            name.into(),
            String::new(),
            String::new(),
            BlockType::default(),
            String::new(),
            false,
            BTreeMap::new(),
        )
    }

    /// Decode one structured JSON record.
    pub fn decode(json: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(json)
    }

    /// Encode the canonical fields as JSON.
    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        prefix: String,
        company_name: String,
        company_address: String,
        country_code: String,
        block_type: BlockType,
        updated: String,
        is_private: bool,
        mut raw_data: BTreeMap<String, String>,
    ) -> Self {
        raw_data.insert("oui".to_string(), prefix.clone());
        raw_data.insert("company".to_string(), company_name.clone());
        raw_data.insert("address".to_string(), company_address.clone());
        raw_data.insert("country".to_string(), country_code.clone());
        raw_data.insert("type".to_string(), block_type.to_string());
        raw_data.insert("updated".to_string(), updated.clone());
        raw_data.insert("private".to_string(), is_private.to_string());

        Self {
            prefix,
            company_name,
            company_address,
            country_code,
            block_type,
            updated,
            is_private,
            raw_data,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn company_address(&self) -> &str {
        &self.company_address
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn block_type(&self) -> BlockType {
        self.block_type
    }

    pub fn updated(&self) -> &str {
        &self.updated
    }

    pub fn is_private(&self) -> bool {
        self.is_private
    }

    pub fn raw_data(&self) -> &BTreeMap<String, String> {
        &self.raw_data
    }
}

/// On-disk shape, in persisted key order
#[derive(Serialize)]
struct EncodedRecord<'a> {
    oui: &'a str,
    company: &'a str,
    address: &'a str,
    country: &'a str,
    #[serde(rename = "type")]
    block_type: &'static str,
    updated: &'a str,
    private: bool,
}

impl Serialize for VendorRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        EncodedRecord {
            oui: &self.prefix,
            company: &self.company_name,
            address: &self.company_address,
            country: &self.country_code,
            block_type: self.block_type.as_str(),
            updated: &self.updated,
            private: self.is_private,
        }
        .serialize(serializer)
    }
}

/// Accepts both the cache file keys and the camelCase keys of structured
/// vendor APIs.
#[derive(Deserialize)]
struct DecodedRecord {
    #[serde(alias = "prefix")]
    oui: String,

    #[serde(alias = "companyName")]
    company: String,

    #[serde(default, alias = "companyAddress", deserialize_with = "lenient_string")]
    address: String,

    #[serde(default, alias = "countryCode", deserialize_with = "lenient_string")]
    country: String,

    #[serde(
        default,
        rename = "type",
        alias = "blockType",
        deserialize_with = "lenient_string"
    )]
    block_type: String,

    #[serde(default, alias = "dateUpdated", deserialize_with = "lenient_string")]
    updated: String,

    #[serde(default, alias = "isPrivate", deserialize_with = "lenient_bool")]
    private: bool,

    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl From<DecodedRecord> for VendorRecord {
    fn from(decoded: DecodedRecord) -> Self {
        let block_type = if decoded.block_type.is_empty() {
            BlockType::default()
        } else {
            decoded.block_type.parse().unwrap_or_else(|e| {
                warn!("{} for {}, assuming MA-L", e, decoded.oui);
                BlockType::default()
            })
        };

        let raw_data = decoded
            .extra
            .into_iter()
            .map(|(key, value)| {
                let text = stringify_value(&key, value);
                (key, text)
            })
            .collect();

        Self::build(
            decoded.oui,
            decoded.company,
            decoded.address,
            decoded.country,
            block_type,
            decoded.updated,
            decoded.private,
            raw_data,
        )
    }
}

fn stringify_value(key: &str, value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        nested => {
            debug!("Keeping nested field {} as JSON text", key);
            nested.to_string()
        }
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" | "" => false,
            other => {
                warn!("Unrecognized private flag {:?}, assuming false", other);
                false
            }
        },
        Value::Number(n) => n.as_i64().is_some_and(|v| v != 0),
        _ => false,
    })
}
