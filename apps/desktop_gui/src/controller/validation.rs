//! Required-field checks shared by the form screens.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome<F> {
    Valid,
    MissingFields(Vec<F>),
}

/// A form field with a human readable label.
pub trait FormField: Copy {
    fn label(self) -> &'static str;
}

/// Only empty input counts as missing; whitespace is passed through untouched.
pub fn require_filled<'a, F, I>(fields: I) -> ValidationOutcome<F>
where
    F: FormField,
    I: IntoIterator<Item = (F, &'a str)>,
{
    let missing: Vec<F> = fields
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

    if missing.is_empty() {
        ValidationOutcome::Valid
    } else {
        ValidationOutcome::MissingFields(missing)
    }
}

pub fn missing_labels<F: FormField>(fields: &[F]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Field {
        A,
        B,
    }

    impl FormField for Field {
        fn label(self) -> &'static str {
            match self {
                Self::A => "A",
                Self::B => "B",
            }
        }
    }

    #[test]
    fn reports_missing_fields_in_form_order() {
        let outcome = require_filled([(Field::A, ""), (Field::B, "")]);
        assert_eq!(outcome, ValidationOutcome::MissingFields(vec![Field::A, Field::B]));
        assert_eq!(missing_labels(&[Field::A, Field::B]), "A, B");
    }

    #[test]
    fn whitespace_counts_as_filled() {
        assert_eq!(
            require_filled([(Field::A, " "), (Field::B, "y")]),
            ValidationOutcome::Valid
        );
    }

    #[test]
    fn filled_fields_are_valid() {
        assert_eq!(
            require_filled([(Field::A, "x"), (Field::B, "y")]),
            ValidationOutcome::Valid
        );
    }
}
