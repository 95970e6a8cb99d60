use serde::{Deserialize, Serialize};

/// An alumni profile as stored in `tb_user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlumniRecord {
    pub id: i32,
    pub name: String,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub grad_year: Option<i32>,
    pub degree: Option<String>,
    pub major: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub bio: Option<String>,
}

/// The mutable fields of a record, used for both create and full-row update.
///
/// Omitted optional fields stay `None` and are stored as NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlumniInput {
    pub name: String,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub grad_year: Option<i32>,
    pub degree: Option<String>,
    pub major: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub bio: Option<String>,
}

impl AlumniInput {
    /// Trims every string field. Present-but-blank strings are kept as `""`.
    #[must_use]
    pub fn trimmed(self) -> Self {
        fn trim(value: Option<String>) -> Option<String> {
            value.map(|v| v.trim().to_string())
        }

        Self {
            name: self.name.trim().to_string(),
            gender: trim(self.gender),
            age: self.age,
            phone: trim(self.phone),
            email: trim(self.email),
            grad_year: self.grad_year,
            degree: trim(self.degree),
            major: trim(self.major),
            city: trim(self.city),
            country: trim(self.country),
            bio: trim(self.bio),
        }
    }
}

/// A search hit handed to the ranking prompt; `bio` is cut down to `snippet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlumniCandidate {
    pub id: i32,
    pub name: String,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub grad_year: Option<i32>,
    pub degree: Option<String>,
    pub major: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub snippet: String,
}

pub const SNIPPET_CHARS: usize = 120;

impl From<AlumniRecord> for AlumniCandidate {
    fn from(record: AlumniRecord) -> Self {
        let snippet = record
            .bio
            .as_deref()
            .unwrap_or_default()
            .chars()
            .take(SNIPPET_CHARS)
            .collect();

        Self {
            id: record.id,
            name: record.name,
            gender: record.gender,
            age: record.age,
            phone: record.phone,
            email: record.email,
            grad_year: record.grad_year,
            degree: record.degree,
            major: record.major,
            city: record.city,
            country: record.country,
            snippet,
        }
    }
}
