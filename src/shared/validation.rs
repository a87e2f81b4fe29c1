use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for contact phone numbers
    /// Optional leading "+", then digits with single spaces or hyphens between groups
    /// - Valid: "+216 71 234 567", "0612345678", "555-0100"
    /// - Invalid: "abc", "12", "+-123", "123--456"
    pub static ref PHONE_REGEX: Regex =
        Regex::new(r"^\+?[0-9]{2,}(?:[ -][0-9]+)*$").expect("valid phone regex");

    /// Regex for vehicle registration plates
    /// Uppercase letters, digits, spaces and hyphens, starting with an alphanumeric
    pub static ref PLATE_REGEX: Regex =
        Regex::new(r"^[A-Z0-9][A-Z0-9 -]{0,15}$").expect("valid plate regex");
}
