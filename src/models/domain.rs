use serde::{Serialize, Serializer};
use serde_json::Value;

/// Column names under which preference fields are fed to the classifier
pub const ADOPTER_HOUSING_TYPE: &str = "Adopter_Housing_Type";
pub const ADOPTER_ALLERGIES: &str = "Adopter_Allergies";
pub const ADOPTER_ACTIVITY_LEVEL: &str = "Adopter_Activity_Level";
pub const ADOPTER_SIZE_PREF: &str = "Adopter_Size_Pref";
pub const ADOPTER_AGE_MIN: &str = "Adopter_Age_Min";
pub const ADOPTER_AGE_MAX: &str = "Adopter_Age_Max";
pub const ADOPTER_ANIMAL_PREF: &str = "Adopter_Animal_Pref";

pub const DEFAULT_AGE_MIN: i64 = 0;
pub const DEFAULT_AGE_MAX: i64 = 999;

/// Normalized adopter questionnaire answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdopterPreferences {
    pub housing_type: String,
    pub allergies: bool,
    pub activity_level: String,
    pub size_pref: String,
    pub age_min: i64,
    pub age_max: i64,
    pub animal_pref: String,
}

impl Default for AdopterPreferences {
    fn default() -> Self {
        Self {
            housing_type: String::new(),
            allergies: false,
            activity_level: String::new(),
            size_pref: String::new(),
            age_min: DEFAULT_AGE_MIN,
            age_max: DEFAULT_AGE_MAX,
            animal_pref: String::new(),
        }
    }
}

impl AdopterPreferences {
    /// Feature columns contributed by the preference record, in a fixed order
    pub const FEATURE_COLUMNS: [&'static str; 7] = [
        ADOPTER_HOUSING_TYPE,
        ADOPTER_ALLERGIES,
        ADOPTER_ACTIVITY_LEVEL,
        ADOPTER_SIZE_PREF,
        ADOPTER_AGE_MIN,
        ADOPTER_AGE_MAX,
        ADOPTER_ANIMAL_PREF,
    ];

    /// Category string of a preference column, as the encoders saw it at training time
    pub fn feature_value(&self, column: &str) -> Option<String> {
        let value = match column {
            ADOPTER_HOUSING_TYPE => self.housing_type.clone(),
            ADOPTER_ALLERGIES => self.allergies_flag().to_string(),
            ADOPTER_ACTIVITY_LEVEL => self.activity_level.clone(),
            ADOPTER_SIZE_PREF => self.size_pref.clone(),
            ADOPTER_AGE_MIN => self.age_min.to_string(),
            ADOPTER_AGE_MAX => self.age_max.to_string(),
            ADOPTER_ANIMAL_PREF => self.animal_pref.clone(),
            _ => return None,
        };
        Some(value)
    }

    pub fn allergies_flag(&self) -> &'static str {
        if self.allergies { "yes" } else { "no" }
    }
}

/// A scored candidate. Serialized as a `[id, score]` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub animal_id: Value,
    pub score: f64,
}

impl Serialize for RankedCandidate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.animal_id, self.score).serialize(serializer)
    }
}
