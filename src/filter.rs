use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Selector value that shows every student
pub const ALL_TARGET: &str = "all";

/// Which student's lessons stay highlighted
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterTarget {
    #[default]
    All,
    Person(String),
}

impl FilterTarget {
    pub fn as_str(&self) -> &str {
        match self {
            FilterTarget::All => ALL_TARGET,
            FilterTarget::Person(name) => name,
        }
    }
}

impl From<&str> for FilterTarget {
    fn from(value: &str) -> Self {
        if value == ALL_TARGET {
            FilterTarget::All
        } else {
            FilterTarget::Person(value.to_string())
        }
    }
}

impl Serialize for FilterTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FilterTarget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(FilterTarget::from(value.as_str()))
    }
}

/// One button in the student selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorEntry {
    pub target: FilterTarget,
    pub label: String,
    pub active: bool,
    pub visible: bool,
}

/// Active selection plus the selector's search box.
///
/// Reset whenever a new timetable is shown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub active: FilterTarget,
    pub search: String,
}

impl FilterState {
    pub fn select_target(&mut self, target: FilterTarget) {
        self.active = target;
    }

    /// Only changes which selector entries are shown, never the dimming
    pub fn update_search(&mut self, query: &str) {
        self.search = query.to_string();
    }

    pub fn is_dimmed(&self, person: &str) -> bool {
        match &self.active {
            FilterTarget::All => false,
            FilterTarget::Person(name) => name != person,
        }
    }

    /// The "all" entry is always visible; others match the search case-insensitively
    pub fn is_visible(&self, person: &str) -> bool {
        person
            .to_lowercase()
            .contains(&self.search.to_lowercase())
    }

    /// Builds the selector: the "all" entry first, then one entry per student
    pub fn selector(&self, people: &[String]) -> Vec<SelectorEntry> {
        let mut entries = Vec::with_capacity(people.len() + 1);
        entries.push(SelectorEntry {
            target: FilterTarget::All,
            label: "Show all".to_string(),
            active: self.active == FilterTarget::All,
            visible: true,
        });
        for person in people {
            let target = FilterTarget::Person(person.clone());
            entries.push(SelectorEntry {
                active: self.active == target,
                visible: self.is_visible(person),
                label: person.clone(),
                target,
            });
        }
        entries
    }
}
