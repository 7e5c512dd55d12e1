use crate::db::StoreError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = StoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(StoreError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

// Labels are the ones the practice already uses in its appointment book.
str_enum!(VisitType {
    Therapy => "Terapia",
    PosturalVisit => "Visita posturale",
    FullCheckUp => "Check-up Completo",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn visit_type_round_trips_through_label() {
        for visit in VisitType::ALL {
            assert_eq!(VisitType::from_str(visit.as_str()).unwrap(), *visit);
        }
    }

    #[test]
    fn visit_type_tolerates_surrounding_whitespace() {
        assert_eq!(
            VisitType::from_str("  Visita posturale ").unwrap(),
            VisitType::PosturalVisit
        );
    }

    #[test]
    fn unknown_visit_type_names_field_and_value() {
        let err = VisitType::from_str("Massaggio").unwrap_err();
        match err {
            StoreError::InvalidEnum { field, value } => {
                assert_eq!(field, "VisitType");
                assert_eq!(value, "Massaggio");
            }
            other => panic!("Expected InvalidEnum, got: {other}"),
        }
    }

    #[test]
    fn display_uses_practice_label() {
        assert_eq!(VisitType::FullCheckUp.to_string(), "Check-up Completo");
    }
}
