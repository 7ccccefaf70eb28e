use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::default_limit;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    /// Unique, URL-safe
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub parent_id: Option<Uuid>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Category {
    pub fn new(input: CreateCategory) -> Self {
        let now = Utc::now();
        let id = Uuid::now_v7();
        let slug = input
            .slug
            .map(|s| slugify(&s))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slug_or_id(&input.name, id));

        Self {
            id,
            name: input.name,
            slug,
            description: input.description,
            image: input.image,
            parent_id: input.parent_id,
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateCategory) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(slug) = update.slug.map(|s| slugify(&s)).filter(|s| !s.is_empty()) {
            self.slug = slug;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(image) = update.image {
            self.image = Some(image);
        }
        if let Some(parent_id) = update.parent_id {
            self.parent_id = Some(parent_id);
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        self.updated_at = Utc::now();
    }
}

/// Lower-case, alphanumerics kept, every other run of characters becomes one `-`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.trim().chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn slug_or_id(name: &str, id: Uuid) -> String {
    let slug = slugify(name);
    if slug.is_empty() { id.to_string() } else { slug }
}

#[derive(Debug, Clone, Default, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Derived from `name` when absent
    #[validate(length(max = 120))]
    pub slug: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub is_active: Option<bool>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 120))]
    pub slug: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub is_active: Option<bool>,
    /// Set only when a new file was uploaded
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct CategoryFilter {
    pub parent_id: Option<Uuid>,
    pub is_active: Option<bool>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: u64,
}
