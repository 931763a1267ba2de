//! Attendance-based template selection.
//!
//! A registrant earns a different certificate depending on which conference
//! days they were marked present for. Attending neither day means no
//! certificate at all, which is a normal outcome rather than an error.

use std::fmt;

/// The three provisioned certificate layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Day1,
    Day2,
    Both,
}

impl TemplateKind {
    /// Stable identifier used for logging and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day1 => "day1",
            Self::Day2 => "day2",
            Self::Both => "both",
        }
    }

    /// File name of the template document inside the template directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Day1 => "day1.pdf",
            Self::Day2 => "day2.pdf",
            Self::Both => "both.pdf",
        }
    }

    /// All kinds, in provisioning order.
    pub fn all() -> [TemplateKind; 3] {
        [Self::Day1, Self::Day2, Self::Both]
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map the two attendance flags to a template, or `None` when the
/// registrant attended neither day.
pub fn select_template(day1: bool, day2: bool) -> Option<TemplateKind> {
    match (day1, day2) {
        (true, false) => Some(TemplateKind::Day1),
        (false, true) => Some(TemplateKind::Day2),
        (true, true) => Some(TemplateKind::Both),
        (false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day1_only_selects_day1_template() {
        assert_eq!(select_template(true, false), Some(TemplateKind::Day1));
    }

    #[test]
    fn day2_only_selects_day2_template() {
        assert_eq!(select_template(false, true), Some(TemplateKind::Day2));
    }

    #[test]
    fn both_days_select_combined_template() {
        assert_eq!(select_template(true, true), Some(TemplateKind::Both));
    }

    #[test]
    fn no_attendance_means_no_certificate() {
        assert_eq!(select_template(false, false), None);
    }

    #[test]
    fn file_names_match_kinds() {
        assert_eq!(TemplateKind::Day1.file_name(), "day1.pdf");
        assert_eq!(TemplateKind::Day2.file_name(), "day2.pdf");
        assert_eq!(TemplateKind::Both.file_name(), "both.pdf");
    }
}
