use crate::error::BugzillaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bug priority. Callers use the short code, the server wants the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    P0,
    P1,
    P2,
    P3,
    P4,
    P5,
}

impl Priority {
    pub const ALL: [Priority; 6] = [
        Priority::P0,
        Priority::P1,
        Priority::P2,
        Priority::P3,
        Priority::P4,
        Priority::P5,
    ];

    /// Short code, as typed by users.
    pub fn code(&self) -> &'static str {
        match self {
            Priority::P0 => "P0",
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
            Priority::P4 => "P4",
            Priority::P5 => "P5",
        }
    }

    /// Long form, as stored by the server.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::P0 => "P0 - Crit Sit",
            Priority::P1 => "P1 - Urgent",
            Priority::P2 => "P2 - High",
            Priority::P3 => "P3 - Medium",
            Priority::P4 => "P4 - Low",
            Priority::P5 => "P5 - None",
        }
    }

    /// Recognise a server label such as `P2 - High`.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }
}

impl FromStr for Priority {
    type Err = BugzillaError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.code() == code)
            .ok_or_else(|| BugzillaError::InvalidValue {
                field: "priority",
                value: code.to_string(),
            })
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_to_label() {
        assert_eq!("P0".parse::<Priority>().unwrap().label(), "P0 - Crit Sit");
        assert_eq!("P1".parse::<Priority>().unwrap().label(), "P1 - Urgent");
        assert_eq!("P2".parse::<Priority>().unwrap().label(), "P2 - High");
        assert_eq!("P3".parse::<Priority>().unwrap().label(), "P3 - Medium");
        assert_eq!("P4".parse::<Priority>().unwrap().label(), "P4 - Low");
        assert_eq!("P5".parse::<Priority>().unwrap().label(), "P5 - None");
    }

    #[test]
    fn test_unknown_code() {
        let err = "wrong".parse::<Priority>().unwrap_err();
        assert!(err.to_string().contains("invalid priority value: wrong"));
        // Codes are case sensitive and labels are not codes.
        assert!("p1".parse::<Priority>().is_err());
        assert!("P1 - Urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_from_label() {
        assert_eq!(Priority::from_label("P2 - High"), Some(Priority::P2));
        assert_eq!(Priority::from_label("High"), None);
    }
}
