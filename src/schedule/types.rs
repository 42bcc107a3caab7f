use std::collections::BTreeMap;
use std::fmt;
use indexmap::IndexMap;
use serde::{Serialize, Deserialize};

/// Modality of a lesson. The serialized names are the values the generation service expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum LessonCategory {
    #[default]
    #[serde(rename = "対面")]
    FaceToFace,
    #[serde(rename = "SS")]
    SS,
    #[serde(rename = "高校対面")]
    HighSchoolFaceToFace,
}

impl LessonCategory {
    pub const ALL: [LessonCategory; 3] = [
        LessonCategory::FaceToFace,
        LessonCategory::SS,
        LessonCategory::HighSchoolFaceToFace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LessonCategory::FaceToFace => "対面",
            LessonCategory::SS => "SS",
            LessonCategory::HighSchoolFaceToFace => "高校対面",
        }
    }

    /// Maps a wire value back to a category; unknown values yield `None`
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

impl fmt::Display for LessonCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lesson a student needs, repeated `count` times in the timetable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub category: LessonCategory,
    pub count: u64,
}

/// A student's requirements, keyed by name in [`ScheduleRequest::people`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub lessons: Vec<LessonSpec>,
    pub unavailable_dates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CalendarInfo {
    pub dates: Vec<String>,
    pub slots_per_day: Vec<String>,
}

/// The document sent to the generation service and saved as `schedule_data.json`.
///
/// Students keep the order they were entered in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScheduleRequest {
    #[serde(rename = "students")]
    pub people: IndexMap<String, PersonRecord>,
    #[serde(rename = "schedule_info")]
    pub calendar: CalendarInfo,
}

/// A single lesson placed in a (date, slot) cell by the generation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(rename = "student")]
    pub person: String,
    #[serde(rename = "lesson_name")]
    pub lesson_id: String,
    #[serde(rename = "type")]
    pub category: String,
}

impl Assignment {
    pub fn new(person: &str, lesson_id: &str, category: &str) -> Self {
        Assignment {
            person: person.to_string(),
            lesson_id: lesson_id.to_string(),
            category: category.to_string(),
        }
    }
}

/// slot -> assignments
pub type DaySlots = BTreeMap<String, Vec<Assignment>>;

/// date -> slot -> assignments, as returned by the generation service
pub type AssignmentGrid = BTreeMap<String, DaySlots>;

/// Body returned by the generation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub success: bool,
    #[serde(default)]
    pub schedule: Option<AssignmentGrid>,
    #[serde(default)]
    pub message: Option<String>,
}
