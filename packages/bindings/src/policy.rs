//! Field policies: validation and helper text for text fields.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid");
    static ref PHONE: Regex =
        Regex::new(r"^\([1-9]\d{2}\) \d{3}-\d{4}$").expect("phone pattern is valid");
    static ref INTEGER: Regex = Regex::new(r"^-?\d+$").expect("integer pattern is valid");
}

/// Decides whether a text buffer may be committed, and what to tell the
/// user about it.
pub trait FieldPolicy {
    fn validate(&self, value: &str) -> bool;

    fn describe(&self, _value: &str, _valid: bool) -> Option<String> {
        None
    }
}

impl<P: FieldPolicy + ?Sized> FieldPolicy for Box<P> {
    fn validate(&self, value: &str) -> bool {
        (**self).validate(value)
    }

    fn describe(&self, value: &str, valid: bool) -> Option<String> {
        (**self).describe(value, valid)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAll;

impl FieldPolicy for AcceptAll {
    fn validate(&self, _value: &str) -> bool {
        true
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NonEmpty;

impl FieldPolicy for NonEmpty {
    fn validate(&self, value: &str) -> bool {
        !value.trim().is_empty()
    }

    fn describe(&self, _value: &str, valid: bool) -> Option<String> {
        (!valid).then(|| "Required".to_string())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EmailAddress;

impl EmailAddress {
    pub fn is_valid(value: &str) -> bool {
        EMAIL.is_match(value)
    }
}

impl FieldPolicy for EmailAddress {
    fn validate(&self, value: &str) -> bool {
        Self::is_valid(value)
    }

    fn describe(&self, _value: &str, valid: bool) -> Option<String> {
        (!valid).then(|| "Enter an email address".to_string())
    }
}

/// Whole numbers, optionally negative.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntegerText;

impl FieldPolicy for IntegerText {
    fn validate(&self, value: &str) -> bool {
        INTEGER.is_match(value)
    }

    fn describe(&self, _value: &str, valid: bool) -> Option<String> {
        (!valid).then(|| "Whole numbers only".to_string())
    }
}

/// North American numbers written as `(#00) 000-0000`, area code not
/// starting with zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhoneNumber;

impl FieldPolicy for PhoneNumber {
    fn validate(&self, value: &str) -> bool {
        PHONE.is_match(value)
    }

    fn describe(&self, _value: &str, valid: bool) -> Option<String> {
        (!valid).then(|| "Format: (555) 555-5555".to_string())
    }
}

type Validator = Box<dyn Fn(&str) -> bool + Send + Sync>;
type Describer = Box<dyn Fn(&str, bool) -> Option<String> + Send + Sync>;

/// Policy assembled from closures.
pub struct Rules {
    validate: Validator,
    describe: Option<Describer>,
}

impl Rules {
    pub fn new(validate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            validate: Box::new(validate),
            describe: None,
        }
    }

    pub fn describe_with(
        mut self,
        describe: impl Fn(&str, bool) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.describe = Some(Box::new(describe));
        self
    }
}

impl FieldPolicy for Rules {
    fn validate(&self, value: &str) -> bool {
        (self.validate)(value)
    }

    fn describe(&self, value: &str, valid: bool) -> Option<String> {
        self.describe.as_ref().and_then(|d| d(value, valid))
    }
}
