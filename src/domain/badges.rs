//! Badge classification shared by every card surface.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeStyle {
    Writeup,
    Cheatsheet,
    Project,
}

const BADGE_TABLE: &[(&str, BadgeStyle)] = &[
    ("writeups", BadgeStyle::Writeup),
    ("ctf", BadgeStyle::Writeup),
    ("labs", BadgeStyle::Writeup),
    ("malware", BadgeStyle::Writeup),
    ("cheatsheets", BadgeStyle::Cheatsheet),
];

impl BadgeStyle {
    /// Look up the style for a subcategory, falling back to [`BadgeStyle::Project`].
    pub fn for_subcategory(subcategory: Option<&str>) -> Self {
        subcategory
            .and_then(|key| {
                BADGE_TABLE
                    .iter()
                    .find(|(candidate, _)| *candidate == key)
                    .map(|(_, style)| *style)
            })
            .unwrap_or(BadgeStyle::Project)
    }

    pub fn class_name(self) -> &'static str {
        match self {
            BadgeStyle::Writeup => "cat-badge--writeup",
            BadgeStyle::Cheatsheet => "cat-badge--cheatsheet",
            BadgeStyle::Project => "cat-badge--project",
        }
    }
}
