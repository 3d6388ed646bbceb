//! Authentication primitives such as login and signup payloads.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{DisplayName, EmailAddress, Role, UserValidationError};

/// Minimum accepted password length.
pub const PASSWORD_MIN: usize = 8;

/// Domain error returned when a credential payload is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    EmptyPassword,
    PasswordTooShort { min: usize },
    User(UserValidationError),
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::User(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

impl From<UserValidationError> for CredentialValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::User(value)
    }
}

/// Validated login credentials used by the auth service.
///
/// ## Invariants
/// - `email` is normalised (trimmed, lowercased).
/// - `password` is non-empty but retains caller-provided whitespace to avoid
///   surprising credential comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self {
            email: EmailAddress::new(email)?,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email address suitable for user lookups.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated signup payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupDetails {
    name: DisplayName,
    email: EmailAddress,
    password: Zeroizing<String>,
    role: Role,
}

impl SignupDetails {
    /// Construct signup details from raw inputs. An absent role defaults to
    /// [`Role::User`].
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
        role: Option<&str>,
    ) -> Result<Self, CredentialValidationError> {
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(CredentialValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        let role = match role {
            Some(raw) => Role::parse(raw)?,
            None => Role::default(),
        };
        Ok(Self {
            name: DisplayName::new(name)?,
            email: EmailAddress::new(email)?,
            password: Zeroizing::new(password.to_owned()),
            role,
        })
    }

    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ada@example.com", "", CredentialValidationError::EmptyPassword)]
    #[case(
        "not-an-email",
        "secretpass",
        CredentialValidationError::User(UserValidationError::InvalidEmail)
    )]
    fn invalid_login_payloads(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: CredentialValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn login_credentials_normalise_email_and_keep_password() {
        let creds = LoginCredentials::try_from_parts("  Ada@Example.com ", " pw with spaces ")
            .expect("valid inputs");
        assert_eq!(creds.email().as_ref(), "ada@example.com");
        assert_eq!(creds.password(), " pw with spaces ");
    }

    #[rstest]
    fn signup_defaults_role_to_user() {
        let details =
            SignupDetails::try_from_parts("Ada", "ada@example.com", "correcthorse", None)
                .expect("valid signup");
        assert_eq!(details.role(), Role::User);
    }

    #[rstest]
    fn signup_accepts_explicit_role() {
        let details =
            SignupDetails::try_from_parts("Ada", "ada@example.com", "correcthorse", Some("ADMIN"))
                .expect("valid signup");
        assert_eq!(details.role(), Role::Admin);
    }

    #[rstest]
    fn signup_rejects_short_passwords() {
        let err = SignupDetails::try_from_parts("Ada", "ada@example.com", "short", None)
            .expect_err("short password");
        assert_eq!(
            err,
            CredentialValidationError::PasswordTooShort { min: PASSWORD_MIN }
        );
    }

    #[rstest]
    fn signup_rejects_unknown_roles() {
        let err = SignupDetails::try_from_parts(
            "Ada",
            "ada@example.com",
            "correcthorse",
            Some("WIZARD"),
        )
        .expect_err("unknown role");
        assert!(matches!(
            err,
            CredentialValidationError::User(UserValidationError::UnknownRole { .. })
        ));
    }
}
