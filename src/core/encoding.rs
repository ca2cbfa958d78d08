use std::collections::HashMap;

use serde::Deserialize;

/// Fixed mapping from category string to integer code, learned at training time
///
/// The code of a value is its position in the saved class list.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct LabelEncoder {
    classes: Vec<String>,
    codes: HashMap<String, u32>,
}

impl LabelEncoder {
    pub fn from_classes(classes: Vec<String>) -> Result<Self, String> {
        let mut codes = HashMap::with_capacity(classes.len());
        for (position, class) in classes.iter().enumerate() {
            let code = u32::try_from(position).map_err(|_| "too many classes".to_string())?;
            if codes.insert(class.clone(), code).is_some() {
                return Err(format!("duplicate class '{}'", class));
            }
        }
        Ok(Self { classes, codes })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn encode(&self, value: &str) -> Option<u32> {
        self.codes.get(value).copied()
    }

    /// Encode, mapping values never seen in training to `fallback`
    #[inline]
    pub fn encode_or(&self, value: &str, fallback: u32) -> u32 {
        self.encode(value).unwrap_or(fallback)
    }
}

impl TryFrom<Vec<String>> for LabelEncoder {
    type Error = String;

    fn try_from(classes: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_classes(classes)
    }
}
