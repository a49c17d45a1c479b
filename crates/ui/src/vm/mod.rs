mod learn_vm;
mod markdown;
mod time_fmt;

pub use learn_vm::{LessonRowVm, SectionVm, map_sections, progress_label};
pub use markdown::{markdown_to_html, sanitize_html};
pub use time_fmt::{format_duration, format_percent};
