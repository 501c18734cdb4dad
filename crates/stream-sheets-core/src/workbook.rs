//! Workbook-level settings

use crate::date::DateSystem;

/// Workbook-level settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkbookSettings {
    /// Date system read from `workbookPr/@date1904`
    pub date_system: DateSystem,
    /// When set, date cells are rendered as text with this `strftime`
    /// pattern (UTC) instead of being returned as epoch seconds
    pub date_format: Option<String>,
}

impl WorkbookSettings {
    /// Settings for the given date system, dates left as timestamps
    pub fn new(date_system: DateSystem) -> Self {
        Self {
            date_system,
            date_format: None,
        }
    }

    /// Whether the workbook uses the 1904 date system
    pub fn is_1904(&self) -> bool {
        self.date_system == DateSystem::Excel1904
    }
}
