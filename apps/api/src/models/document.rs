use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The canonical resume document.
///
/// Every scalar is a free-text string; absent or `null` values in stored JSON
/// become empty strings. Unknown keys are ignored so older and newer stored
/// documents both load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    #[serde(deserialize_with = "nullable_string")]
    pub full_name: String,
    #[serde(deserialize_with = "nullable_string")]
    pub job_title: String,
    #[serde(deserialize_with = "nullable_string")]
    pub email: String,
    #[serde(deserialize_with = "nullable_string")]
    pub phone: String,
    #[serde(deserialize_with = "nullable_string")]
    pub location: String,
    #[serde(deserialize_with = "nullable_string")]
    pub linkedin: String,
    #[serde(deserialize_with = "nullable_string")]
    pub website: String,
    #[serde(deserialize_with = "nullable_string")]
    pub summary: String,
    #[serde(deserialize_with = "nullable_string")]
    pub skills: String,
    #[serde(deserialize_with = "nullable_list")]
    pub experience: Vec<ExperienceEntry>,
    #[serde(deserialize_with = "nullable_list")]
    pub education: Vec<EducationEntry>,
    pub template: TemplateId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    #[serde(deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(deserialize_with = "nullable_string")]
    pub company: String,
    #[serde(deserialize_with = "nullable_string")]
    pub dates: String,
    #[serde(deserialize_with = "nullable_string")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    #[serde(deserialize_with = "nullable_string")]
    pub degree: String,
    #[serde(deserialize_with = "nullable_string")]
    pub school: String,
    #[serde(deserialize_with = "nullable_string")]
    pub dates: String,
}

impl ExperienceEntry {
    /// An entry without a title is kept in the form but never rendered.
    pub fn is_renderable(&self) -> bool {
        !self.title.is_empty()
    }
}

impl EducationEntry {
    pub fn is_renderable(&self) -> bool {
        !self.degree.is_empty()
    }
}

impl Document {
    /// True when none of the header fields that trigger a preview are filled in.
    pub fn is_blank_header(&self) -> bool {
        self.full_name.is_empty() && self.job_title.is_empty() && self.email.is_empty()
    }
}

/// The two repeatable sections of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Experience,
    Education,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Experience => "experience",
            Section::Education => "education",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "experience" => Ok(Section::Experience),
            "education" => Ok(Section::Education),
            other => Err(format!("unknown section '{other}'")),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Template identifiers
// ────────────────────────────────────────────────────────────────────────────

/// One of the fixed visual templates. Persisted as the string id `"1"`..`"10"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemplateId {
    #[default]
    Classic,
    Modern,
    Minimal,
    Creative,
    Professional,
    Elegant,
    Tech,
    Bold,
    Clean,
    Contemporary,
}

impl TemplateId {
    pub const ALL: [TemplateId; 10] = [
        TemplateId::Classic,
        TemplateId::Modern,
        TemplateId::Minimal,
        TemplateId::Creative,
        TemplateId::Professional,
        TemplateId::Elegant,
        TemplateId::Tech,
        TemplateId::Bold,
        TemplateId::Clean,
        TemplateId::Contemporary,
    ];

    /// Numeric id used in storage and in the `template-{id}` CSS class.
    pub fn number(&self) -> u8 {
        match self {
            TemplateId::Classic => 1,
            TemplateId::Modern => 2,
            TemplateId::Minimal => 3,
            TemplateId::Creative => 4,
            TemplateId::Professional => 5,
            TemplateId::Elegant => 6,
            TemplateId::Tech => 7,
            TemplateId::Bold => 8,
            TemplateId::Clean => 9,
            TemplateId::Contemporary => 10,
        }
    }

    pub fn from_number(n: u64) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| u64::from(t.number()) == n)
    }

    pub fn css_class(&self) -> String {
        format!("template-{}", self.number())
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl std::str::FromStr for TemplateId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .ok()
            .and_then(TemplateId::from_number)
            .ok_or_else(|| format!("unknown template '{s}'"))
    }
}

impl Serialize for TemplateId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Accepts `"3"`, `3` or `null`; anything unrecognised falls back to the default.
impl<'de> Deserialize<'de> for TemplateId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawTemplateId {
            Text(String),
            Number(u64),
            Other(serde_json::Value),
        }

        let id = match Option::<RawTemplateId>::deserialize(deserializer)? {
            Some(RawTemplateId::Text(s)) => s.parse().ok(),
            Some(RawTemplateId::Number(n)) => TemplateId::from_number(n),
            Some(RawTemplateId::Other(_)) | None => None,
        };
        Ok(id.unwrap_or_default())
    }
}

fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_camel_case_with_string_template() {
        let doc = Document {
            full_name: "Ada Lovelace".to_string(),
            template: TemplateId::Tech,
            ..Default::default()
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["fullName"], "Ada Lovelace");
        assert_eq!(value["jobTitle"], "");
        assert_eq!(value["template"], "7");
        assert!(value["experience"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_missing_keys_become_empty() {
        let doc: Document = serde_json::from_value(json!({ "fullName": "Ada" })).unwrap();
        assert_eq!(doc.full_name, "Ada");
        assert_eq!(doc.email, "");
        assert!(doc.experience.is_empty());
        assert_eq!(doc.template, TemplateId::Classic);
    }

    #[test]
    fn test_null_values_become_empty() {
        let doc: Document = serde_json::from_value(json!({
            "fullName": null,
            "experience": null,
            "education": [{ "degree": "BSc", "school": null }],
            "template": null
        }))
        .unwrap();
        assert_eq!(doc.full_name, "");
        assert!(doc.experience.is_empty());
        assert_eq!(doc.education[0].school, "");
        assert_eq!(doc.template, TemplateId::Classic);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let doc: Document = serde_json::from_value(json!({
            "fullName": "Ada",
            "projects": [{ "name": "Engine" }],
            "experience": [{ "title": "Analyst", "team": "R&D" }]
        }))
        .unwrap();
        assert_eq!(doc.full_name, "Ada");
        assert_eq!(doc.experience[0].title, "Analyst");
        assert_eq!(doc.experience[0].company, "");
    }

    #[test]
    fn test_template_accepts_number_and_unknown_falls_back() {
        let doc: Document = serde_json::from_value(json!({ "template": 4 })).unwrap();
        assert_eq!(doc.template, TemplateId::Creative);
        let doc: Document = serde_json::from_value(json!({ "template": "42" })).unwrap();
        assert_eq!(doc.template, TemplateId::Classic);
        let doc: Document = serde_json::from_value(json!({ "template": ["x"] })).unwrap();
        assert_eq!(doc.template, TemplateId::Classic);
    }

    #[test]
    fn test_template_parse_and_class() {
        assert_eq!("10".parse::<TemplateId>().unwrap(), TemplateId::Contemporary);
        assert!("0".parse::<TemplateId>().is_err());
        assert_eq!(TemplateId::Modern.css_class(), "template-2");
    }

    #[test]
    fn test_renderable_entries() {
        assert!(!ExperienceEntry::default().is_renderable());
        let edu = EducationEntry {
            degree: "MSc".to_string(),
            ..Default::default()
        };
        assert!(edu.is_renderable());
    }
}
