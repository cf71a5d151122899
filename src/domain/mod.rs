//! Domain layer: strong types with validation and invariants (no I/O).

mod response;
mod validation;
mod value;

pub use response::{FlatResponse, FlatValue};
pub use validation::ValidationError;
pub use value::{Credentials, Password, PhoneNumber, Recipient, UserId};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_rejects_empty() {
        assert!(matches!(
            UserId::new("   "),
            Err(ValidationError::Empty {
                field: UserId::FIELD
            })
        ));
    }

    #[test]
    fn password_rejects_empty() {
        assert!(matches!(
            Password::new(""),
            Err(ValidationError::Empty {
                field: Password::FIELD
            })
        ));
    }

    #[test]
    fn credentials_trim_the_user_but_preserve_the_password() {
        let creds = Credentials::new(" 79251234567 ", " secret ").unwrap();
        assert_eq!(creds.user().as_str(), "79251234567");
        assert_eq!(creds.password().as_str(), " secret ");
    }

    #[test]
    fn recipient_strips_common_formatting() {
        let recipient = Recipient::normalize("+7 (555) 555-55-55").unwrap();
        assert_eq!(recipient.as_str(), "75555555555");
    }

    #[test]
    fn recipient_accepts_bare_digit_runs_in_range() {
        assert!(Recipient::normalize("75555555555").is_ok());
        assert!(Recipient::normalize("12345678901234").is_ok());
    }

    #[test]
    fn recipient_rejects_out_of_range_and_non_digits() {
        for input in ["123", "1234567890", "123456789012345", "7925abc4567x", ""] {
            assert!(
                matches!(
                    Recipient::normalize(input),
                    Err(ValidationError::InvalidRecipient { .. })
                ),
                "expected rejection for {input:?}"
            );
        }
    }

    #[test]
    fn recipient_rejects_interior_plus() {
        assert!(Recipient::normalize("7925+1234567").is_err());
    }

    #[test]
    fn phone_number_parses_with_region_and_converts_to_recipient() {
        let pn = PhoneNumber::parse(Some(phonenumber::country::Id::RU), "8 (925) 123-45-67")
            .unwrap();
        assert_eq!(pn.e164(), "+79251234567");

        let recipient = Recipient::try_from(pn).unwrap();
        assert_eq!(recipient.as_str(), "79251234567");
    }
}
