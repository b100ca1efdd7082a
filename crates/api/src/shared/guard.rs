use crate::error::GreentickError;
use greentick_domain::Customer;

pub struct Guard {}

impl Guard {
    /// Trims the value and rejects it when nothing is left
    pub fn against_blank(field: &str, val: &str) -> Result<String, GreentickError> {
        let val = val.trim();
        if val.is_empty() {
            return Err(GreentickError::BadClientData(format!(
                "The {} can not be empty",
                field
            )));
        }
        Ok(val.to_string())
    }

    /// Normalizes a phone number and rejects malformed ones
    pub fn against_invalid_phone(phone: &str) -> Result<String, GreentickError> {
        if !Customer::is_valid_phone(phone) {
            return Err(GreentickError::BadClientData(format!(
                "The phone number: {}, is not valid",
                phone
            )));
        }
        Ok(Customer::normalize_phone(phone))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn guards_input() {
        assert_eq!(Guard::against_blank("name", "  Asha ").unwrap(), "Asha");
        assert!(Guard::against_blank("name", "   ").is_err());
        assert_eq!(
            Guard::against_invalid_phone("+91 98765 43210").unwrap(),
            "+919876543210"
        );
        assert!(Guard::against_invalid_phone("call me").is_err());
    }
}
