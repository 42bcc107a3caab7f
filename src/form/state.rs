use std::fmt;
use serde::{Deserialize, Serialize};

use crate::error::ViewerError;
use crate::schedule::LessonCategory;

/// Stable handle for a person entry or lesson row inside one [`FormState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u32);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A lesson row exactly as typed; `count` is validated only when collected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonRow {
    pub id: EntryId,
    pub name: String,
    pub count: String,
    pub category: LessonCategory,
}

/// One student box on the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonEntry {
    pub id: EntryId,
    pub name: String,
    /// Comma-separated, as typed
    pub unavailable_dates: String,
    pub lessons: Vec<LessonRow>,
}

/// The editable form: student boxes in on-screen order plus the calendar inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FormState {
    people: Vec<PersonEntry>,
    pub schedule_dates: String,
    pub schedule_slots: String,
    next_id: u32,
}

/// Operator actions on the form, tagged by `action`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FormAction {
    AddPerson,
    RemovePerson { person: EntryId },
    AddLesson { person: EntryId },
    RemoveLesson { person: EntryId, lesson: EntryId },
    SetPersonName { person: EntryId, value: String },
    SetUnavailableDates { person: EntryId, value: String },
    SetLessonName { person: EntryId, lesson: EntryId, value: String },
    SetLessonCount { person: EntryId, lesson: EntryId, value: String },
    SetLessonCategory { person: EntryId, lesson: EntryId, category: LessonCategory },
    SetScheduleDates { value: String },
    SetScheduleSlots { value: String },
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn people(&self) -> &[PersonEntry] {
        &self.people
    }

    pub fn person(&self, id: EntryId) -> Option<&PersonEntry> {
        self.people.iter().find(|p| p.id == id)
    }

    /// Applies one action. Returns the id of the entry created, if any.
    pub fn apply(&mut self, action: FormAction) -> Result<Option<EntryId>, ViewerError> {
        match action {
            FormAction::AddPerson => Ok(Some(self.add_person())),
            FormAction::RemovePerson { person } => {
                self.remove_person(person)?;
                Ok(None)
            }
            FormAction::AddLesson { person } => self.add_lesson(person).map(Some),
            FormAction::RemoveLesson { person, lesson } => {
                self.remove_lesson(person, lesson)?;
                Ok(None)
            }
            FormAction::SetPersonName { person, value } => {
                self.person_mut(person)?.name = value;
                Ok(None)
            }
            FormAction::SetUnavailableDates { person, value } => {
                self.person_mut(person)?.unavailable_dates = value;
                Ok(None)
            }
            FormAction::SetLessonName { person, lesson, value } => {
                self.lesson_mut(person, lesson)?.name = value;
                Ok(None)
            }
            FormAction::SetLessonCount { person, lesson, value } => {
                self.lesson_mut(person, lesson)?.count = value;
                Ok(None)
            }
            FormAction::SetLessonCategory { person, lesson, category } => {
                self.lesson_mut(person, lesson)?.category = category;
                Ok(None)
            }
            FormAction::SetScheduleDates { value } => {
                self.schedule_dates = value;
                Ok(None)
            }
            FormAction::SetScheduleSlots { value } => {
                self.schedule_slots = value;
                Ok(None)
            }
        }
    }

    pub fn add_person(&mut self) -> EntryId {
        let id = self.allocate_id();
        self.people.push(PersonEntry {
            id,
            name: String::new(),
            unavailable_dates: String::new(),
            lessons: Vec::new(),
        });
        id
    }

    pub fn remove_person(&mut self, person: EntryId) -> Result<(), ViewerError> {
        let index = self
            .people
            .iter()
            .position(|p| p.id == person)
            .ok_or(ViewerError::UnknownEntry(person))?;
        self.people.remove(index);
        Ok(())
    }

    /// Appends an empty lesson row to the end of the person's list
    pub fn add_lesson(&mut self, person: EntryId) -> Result<EntryId, ViewerError> {
        let index = self
            .people
            .iter()
            .position(|p| p.id == person)
            .ok_or(ViewerError::UnknownEntry(person))?;
        let id = self.allocate_id();
        self.people[index].lessons.push(LessonRow {
            id,
            name: String::new(),
            count: String::new(),
            category: LessonCategory::default(),
        });
        Ok(id)
    }

    pub fn remove_lesson(&mut self, person: EntryId, lesson: EntryId) -> Result<(), ViewerError> {
        let entry = self.person_mut(person)?;
        let index = entry
            .lessons
            .iter()
            .position(|l| l.id == lesson)
            .ok_or(ViewerError::UnknownEntry(lesson))?;
        entry.lessons.remove(index);
        Ok(())
    }

    pub fn person_mut(&mut self, person: EntryId) -> Result<&mut PersonEntry, ViewerError> {
        self.people
            .iter_mut()
            .find(|p| p.id == person)
            .ok_or(ViewerError::UnknownEntry(person))
    }

    pub fn lesson_mut(
        &mut self,
        person: EntryId,
        lesson: EntryId,
    ) -> Result<&mut LessonRow, ViewerError> {
        self.person_mut(person)?
            .lessons
            .iter_mut()
            .find(|l| l.id == lesson)
            .ok_or(ViewerError::UnknownEntry(lesson))
    }

    fn allocate_id(&mut self) -> EntryId {
        self.next_id += 1;
        EntryId(self.next_id)
    }
}
