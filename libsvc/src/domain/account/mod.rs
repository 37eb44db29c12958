//! Provides functionality for registering accounts.
use std::fmt;

use secrecy::{ExposeSecret, Secret};
use serde::{
    de::{IgnoredAny, MapAccess, Visitor},
    Deserialize, Deserializer,
};

use crate::{
    foundation::validation::{FieldRules, Violation, Violations},
    validated_field,
};

pub mod logic;
pub mod service;

validated_field! {FirstName, FieldRules::text("firstName", 1, 50)}
validated_field! {LastName, FieldRules::text("lastName", 1, 50)}
validated_field! {Username, FieldRules::text("username", 1, 50)}
validated_field! {Email, FieldRules::email("email", 5, 254)}

/// Holds the password in a secret so it is never printed.
#[derive(Debug)]
pub struct Password(Secret<String>);

impl Password {
    pub const RULES: FieldRules = FieldRules::text("password", 8, 100);

    pub fn parse(v: Option<String>) -> Result<Password, Vec<Violation>> {
        let violations = Self::RULES.check(v.as_deref());
        match v {
            Some(v) if violations.is_empty() => Ok(Self(Secret::new(v))),
            _ => Err(violations),
        }
    }
}

impl ExposeSecret<String> for Password {
    fn expose_secret(&self) -> &String {
        self.0.expose_secret()
    }
}

/// A registration attempt as submitted by the caller. Every field is
/// optional so that missing keys are reported as violations rather than
/// rejected by the deserializer.
#[derive(Debug, Default, Clone)]
pub struct RegistrationRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Only objects are accepted; a sequence is never read by position.
impl<'de> Deserialize<'de> for RegistrationRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RegistrationRequestVisitor)
    }
}

struct RegistrationRequestVisitor;

impl<'de> Visitor<'de> for RegistrationRequestVisitor {
    type Value = RegistrationRequest;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object with firstName, lastName, username, email and password")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut request = RegistrationRequest::default();
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "firstName" => request.first_name = map.next_value()?,
                "lastName" => request.last_name = map.next_value()?,
                "username" => request.username = map.next_value()?,
                "email" => request.email = map.next_value()?,
                "password" => request.password = map.next_value()?,
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(request)
    }
}

impl RegistrationRequest {
    pub fn new(
        first_name: &str,
        last_name: &str,
        username: &str,
        email: &str,
        password: &str,
    ) -> Self {
        Self {
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
            username: Some(username.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    /// Checks every field and reports all violations at once, in field
    /// declaration order.
    pub fn validate(&self) -> Result<Registration, Violations> {
        match (
            FirstName::parse(self.first_name.clone()),
            LastName::parse(self.last_name.clone()),
            Username::parse(self.username.clone()),
            Email::parse(self.email.clone()),
            Password::parse(self.password.clone()),
        ) {
            (Ok(first_name), Ok(last_name), Ok(username), Ok(email), Ok(password)) => {
                Ok(Registration {
                    first_name,
                    last_name,
                    username,
                    email,
                    password,
                })
            }
            (first_name, last_name, username, email, password) => {
                let violations: Vec<Violation> = [
                    first_name.err(),
                    last_name.err(),
                    username.err(),
                    email.err(),
                    password.err(),
                ]
                .into_iter()
                .flatten()
                .flatten()
                .collect();
                Err(Violations(violations))
            }
        }
    }
}

/// A registration request that satisfied every field rule.
#[derive(Debug)]
pub struct Registration {
    first_name: FirstName,
    last_name: LastName,
    username: Username,
    email: Email,
    password: Password,
}

impl Registration {
    pub fn first_name(&self) -> &FirstName {
        &self.first_name
    }

    pub fn last_name(&self) -> &LastName {
        &self.last_name
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &Password {
        &self.password
    }
}
