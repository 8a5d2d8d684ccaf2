//! Error kind names.
//!
//! Every [`ErrorNode`](crate::ErrorNode) carries a kind name used for
//! kind-based dispatch and formatting. The constants here cover everything
//! the validator engine emits plus the application-level kinds; callers may
//! also use their own kind strings freely.

/// A required value was empty.
pub const REQUIRED: &str = "REQUIRED";
/// A conditional value was set when it must not be.
pub const CONDITIONAL: &str = "CONDITIONAL";

/// Value is not a string.
pub const TYPE_STRING: &str = "TYPE_STRING";
/// Value is not a number (and not a coercible numeric string).
pub const TYPE_NUMBER: &str = "TYPE_NUMBER";
/// Value is not a boolean (and not a coercible boolean form).
pub const TYPE_BOOLEAN: &str = "TYPE_BOOLEAN";
/// Value is not a valid date.
pub const TYPE_DATE: &str = "TYPE_DATE";
/// Value is not an object.
pub const TYPE_OBJECT: &str = "TYPE_OBJECT";
/// Value is not an array.
pub const TYPE_ARRAY: &str = "TYPE_ARRAY";

/// Aggregate error for an object with per-field failures.
pub const OBJECT_FIELDS: &str = "OBJECT_FIELDS";
/// Aggregate error for an array with per-element failures.
pub const ARRAY_FIELDS: &str = "ARRAY_FIELDS";
/// A strict object received a field with no validator declared.
pub const NO_VALIDATION: &str = "NO_VALIDATION";

/// Too few characters or elements.
pub const LENGTH_MIN: &str = "LENGTH_MIN";
/// Too many characters or elements.
pub const LENGTH_MAX: &str = "LENGTH_MAX";
/// Non-alpha characters present.
pub const ALPHA: &str = "ALPHA";
/// Non-alphanumeric characters present.
pub const ALPHANUMERIC: &str = "ALPHANUMERIC";
/// Blacklisted characters present.
pub const CHARS_BLACKLIST: &str = "CHARS_BLACKLIST";
/// Characters outside the whitelist present.
pub const CHARS_WHITELIST: &str = "CHARS_WHITELIST";
/// Not a valid e-mail address.
pub const EMAIL: &str = "EMAIL";
/// Value is not a member of the allowed set.
pub const ENUM: &str = "ENUM";
/// Value is not lowercase.
pub const LOWERCASE: &str = "LOWERCASE";
/// Value is not uppercase.
pub const UPPERCASE: &str = "UPPERCASE";
/// Luhn checksum failed.
pub const LUHN: &str = "LUHN";
/// Non-numeric characters present.
pub const NUMERIC: &str = "NUMERIC";
/// Not a plausible phone number.
pub const PHONE: &str = "PHONE";
/// A user-supplied regex did not match.
pub const REGEX: &str = "REGEX";
/// Value has surrounding whitespace.
pub const TRIM: &str = "TRIM";

/// Value is not an integer.
pub const INT: &str = "INT";
/// Value is below the minimum.
pub const MIN: &str = "MIN";
/// Value is above the maximum.
pub const MAX: &str = "MAX";
/// Value is outside all allowed ranges.
pub const RANGE: &str = "RANGE";

/// Value must be true.
pub const TRUE: &str = "TRUE";
/// Value must be false.
pub const FALSE: &str = "FALSE";
/// Value is not before the threshold.
pub const TIME_BEFORE: &str = "TIME_BEFORE";
/// Value is not after the threshold.
pub const TIME_AFTER: &str = "TIME_AFTER";

// Application-level kinds, usable when building error trees by hand.
/// The user submitted invalid information.
pub const USER_ERROR: &str = "UserError";
/// Authorization required or denied.
pub const AUTH_ERROR: &str = "AuthError";
/// A resource was not found.
pub const NOT_FOUND: &str = "NotFoundError";
/// A server error occurred, with a message safe to show the user.
pub const NOTIFY_USER: &str = "NotifyUser";
/// The developer misconfigured something.
pub const DEV_ERROR: &str = "DevError";
/// A server error occurred.
pub const SERVER_ERROR: &str = "ServerError";
