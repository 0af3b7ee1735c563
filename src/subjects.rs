/// Primary academic subjects, in display order.
pub const SUBJECTS_CORE: [&str; 5] = ["English", "Math", "Science", "Chinese", "Thai"];

/// Secondary subjects, in display order.
pub const SUBJECTS_COCORE: [&str; 6] = ["Drama", "Art", "ICT", "Social Studies", "Music", "PE"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectGroup {
    Core,
    CoCore,
}

impl SubjectGroup {
    #[cfg(test)]
    pub const ALL: [SubjectGroup; 2] = [SubjectGroup::Core, SubjectGroup::CoCore];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "core" => Some(Self::Core),
            "cocore" => Some(Self::CoCore),
            _ => None,
        }
    }

    /// Prefix used in rating keys (`core:Math`).
    pub fn key(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::CoCore => "cocore",
        }
    }

    pub fn subjects(self) -> &'static [&'static str] {
        match self {
            Self::Core => &SUBJECTS_CORE,
            Self::CoCore => &SUBJECTS_COCORE,
        }
    }

    pub fn contains(self, subject: &str) -> bool {
        self.subjects().iter().any(|s| *s == subject)
    }
}

pub fn rating_key(group: SubjectGroup, subject: &str) -> String {
    format!("{}:{}", group.key(), subject)
}

/// Splits a rating key back into its group and subject. Keys naming a subject
/// outside the fixed sets are rejected.
pub fn parse_rating_key(key: &str) -> Option<(SubjectGroup, &'static str)> {
    let (group_raw, subject_raw) = key.split_once(':')?;
    let group = SubjectGroup::parse(group_raw)?;
    group
        .subjects()
        .iter()
        .find(|s| **s == subject_raw)
        .map(|s| (group, *s))
}
