//! Static course catalog.
//!
//! Courses either come in language variants (one teacher per language) or in
//! study groups (one teacher per group). Feedback may name the variant or
//! group it refers to.

use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<CourseVariant>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<CourseGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub teachers: Vec<Teacher>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CourseVariant {
    pub lang: String,
    pub teacher: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CourseGroup {
    pub name: String,
    pub teacher: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Teacher {
    pub name: String,
}

fn variant(lang: &str, teacher: &str) -> CourseVariant {
    CourseVariant {
        lang: lang.to_string(),
        teacher: teacher.to_string(),
    }
}

fn group(name: &str, teacher: &str) -> CourseGroup {
    CourseGroup {
        name: name.to_string(),
        teacher: teacher.to_string(),
    }
}

/// The fixed catalog served by `GET /api/courses`.
#[must_use]
pub fn catalog() -> Vec<Course> {
    vec![
        Course {
            id: 1,
            name: "Mathematics".to_string(),
            variants: Vec::new(),
            groups: vec![group("M-101", "Anna Petrova"), group("M-102", "Ivan Sokolov")],
            teachers: vec![Teacher {
                name: "Anna Petrova".to_string(),
            }],
        },
        Course {
            id: 2,
            name: "Physics".to_string(),
            variants: vec![variant("en", "John Miller"), variant("ru", "Oleg Smirnov")],
            groups: Vec::new(),
            teachers: vec![Teacher {
                name: "John Miller".to_string(),
            }],
        },
    ]
}

#[must_use]
pub fn course_exists(course_id: u64) -> bool {
    catalog().iter().any(|course| course.id == course_id)
}

#[utoipa::path(
    get,
    path = "/api/courses",
    responses(
        (status = 200, description = "Course catalog", body = [Course])
    ),
    tag = "courses"
)]
pub async fn list_courses() -> Json<Vec<Course>> {
    Json(catalog())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn catalog_has_mathematics_and_physics() {
        let courses = catalog();
        let names: Vec<(u64, &str)> = courses
            .iter()
            .map(|course| (course.id, course.name.as_str()))
            .collect();
        assert_eq!(names, [(1, "Mathematics"), (2, "Physics")]);
        assert!(course_exists(2));
        assert!(!course_exists(999));
    }

    #[test]
    fn empty_variant_lists_are_omitted() -> Result<()> {
        let value = serde_json::to_value(catalog())?;
        assert!(value[0].get("variants").is_none());
        assert_eq!(value[0]["groups"][0]["name"], "M-101");
        assert!(value[1].get("groups").is_none());
        assert_eq!(value[1]["variants"][1]["lang"], "ru");
        Ok(())
    }
}
