#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subject {
    pub name: &'static str,
    pub color: &'static str,
}

pub const SUBJECTS: &[Subject] = &[
    Subject { name: "Mathematics", color: "#FFA726" },
    Subject { name: "Geography", color: "#66BB6A" },
    Subject { name: "Biology", color: "#42A5F5" },
    Subject { name: "Physics", color: "#AB47BC" },
    Subject { name: "Chemistry", color: "#FF7043" },
    Subject { name: "History", color: "#26C6DA" },
    Subject { name: "English", color: "#FFCA28" },
    Subject { name: "Physiology", color: "#EC407A" },
    Subject { name: "Art", color: "#8D6E63" },
    Subject { name: "Music", color: "#78909C" },
    Subject { name: "Economics", color: "#26A69A" },
];

/// Colors offered when tagging a task. Any `#RRGGBB` value is accepted.
pub const PALETTE: &[&str] = &[
    "#FFA726", "#66BB6A", "#42A5F5", "#AB47BC", "#FF7043", "#26C6DA", "#FFCA28", "#EC407A",
    "#8D6E63", "#78909C", "#26A69A", "#FFEB3B", "#795548", "#607D8B", "#F44336",
];

pub const DEFAULT_COLOR: &str = "#000000";

/// Case-insensitive lookup in the subject catalog.
pub fn find_subject(name: &str) -> Option<&'static Subject> {
    let trimmed = name.trim();
    SUBJECTS
        .iter()
        .find(|subject| subject.name.eq_ignore_ascii_case(trimmed))
}
