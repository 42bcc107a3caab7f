pub mod types;
pub mod label;

pub use types::{
    Assignment, AssignmentGrid, CalendarInfo, DaySlots, GenerationResponse, LessonCategory,
    LessonSpec, PersonRecord, ScheduleRequest,
};
pub use label::{derive_base_label, format_assignment_label};
