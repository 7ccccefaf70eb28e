use super::store::StoredFile;
use crate::errors::AppError;
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

/// Text fields and stored files of one multipart request.
///
/// Empty text values count as absent, matching how HTML forms submit
/// untouched inputs.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: Vec<StoredFile>,
}

impl MultipartForm {
    pub(crate) fn insert_text(&mut self, name: String, value: String) {
        self.fields.insert(name, value);
    }

    pub(crate) fn insert_file(&mut self, file: StoredFile) {
        self.files.push(file);
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn string(&self, name: &str) -> Option<String> {
        self.text(name).map(str::to_string)
    }

    /// Required text field; 400 when missing.
    pub fn require(&self, name: &str) -> Result<String, AppError> {
        self.string(name)
            .ok_or_else(|| AppError::BadRequest(format!("{name} is required")))
    }

    /// Parse a text field; 400 when present but malformed.
    pub fn parse<T>(&self, name: &str) -> Result<Option<T>, AppError>
    where
        T: FromStr,
    {
        self.text(name)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|_| AppError::BadRequest(format!("Invalid value for {name}")))
            })
            .transpose()
    }

    /// Checkbox-style boolean: `true`/`1` is true, anything else false.
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.text(name)
            .map(|raw| raw.eq_ignore_ascii_case("true") || raw == "1")
    }

    pub fn uuid(&self, name: &str) -> Result<Option<Uuid>, AppError> {
        self.parse::<Uuid>(name)
    }

    /// Public paths of the files uploaded on `field`, in request order.
    pub fn files(&self, field: &str) -> Vec<String> {
        self.files
            .iter()
            .filter(|f| f.field == field)
            .map(|f| f.path.clone())
            .collect()
    }

    /// First file uploaded on `field`.
    pub fn file(&self, field: &str) -> Option<String> {
        self.files
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.path.clone())
    }
}
