pub mod state;
pub mod codec;
pub mod export;

pub use state::{EntryId, FormAction, FormState, LessonRow, PersonEntry};
pub use codec::{collect, format_list, parse_list, populate};
pub use export::{to_csv, to_json_document, write_artifact, CSV_FILE_NAME, JSON_FILE_NAME};
