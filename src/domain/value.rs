use crate::domain::validation::ValidationError;

use phonenumber::country;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// OMS account identifier (`userId`).
///
/// The gateway also uses this value as the reply phone for every request.
/// Invariant: non-empty after trimming.
pub struct UserId(String);

impl UserId {
    /// Element name used by the OMS wire format (`userId`).
    pub const FIELD: &'static str = "userId";

    /// Create a validated [`UserId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// OMS account password.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct Password(String);

impl Password {
    /// Element name used by the OMS wire format (`password`).
    pub const FIELD: &'static str = "password";

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Account credentials supplied once at client construction.
pub struct Credentials {
    user: UserId,
    password: Password,
}

impl Credentials {
    /// Create validated credentials from a user identifier and password.
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            user: UserId::new(user)?,
            password: Password::new(password)?,
        })
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn password(&self) -> &Password {
        &self.password
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Recipient number in the digits-only form the gateway accepts.
///
/// Invariant: 11 to 14 ASCII decimal digits. [`Recipient::normalize`] strips
/// parentheses, hyphens, spaces and one leading `+` before checking.
pub struct Recipient(String);

impl Recipient {
    /// Element name used by the OMS wire format (`recipient`).
    pub const FIELD: &'static str = "recipient";

    /// Minimum digit count accepted by the gateway.
    pub const MIN_DIGITS: usize = 11;
    /// Maximum digit count accepted by the gateway.
    pub const MAX_DIGITS: usize = 14;

    /// Normalize a phone number in any common formatting into a [`Recipient`].
    ///
    /// `"+7 (555) 555-55-55"` normalizes to `75555555555`. Inputs that do not
    /// reduce to 11–14 digits are rejected.
    pub fn normalize(input: impl AsRef<str>) -> Result<Self, ValidationError> {
        let input = input.as_ref();
        let stripped = input.replace(['(', ')', '-', ' '], "");
        let digits = stripped.strip_prefix('+').unwrap_or(&stripped);

        let valid = (Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits.len())
            && digits.bytes().all(|byte| byte.is_ascii_digit());
        if !valid {
            return Err(ValidationError::InvalidRecipient {
                input: input.to_owned(),
            });
        }
        Ok(Self(digits.to_owned()))
    }

    /// Borrow the normalized digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<PhoneNumber> for Recipient {
    type Error = ValidationError;

    /// Convert an already-parsed phone number via its E.164 form.
    fn try_from(value: PhoneNumber) -> Result<Self, Self::Error> {
        Self::normalize(&value.e164)
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Opt-in alternative to [`Recipient::normalize`] for callers that want real
/// phone-number parsing. Equality and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit
    /// country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty {
                field: Recipient::FIELD,
            });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}
