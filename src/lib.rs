//! Validator combinators that coerce untrusted input and build mergeable,
//! hierarchical error trees.
//!
//! The crate has two halves that meet in the middle:
//!
//! - **Error trees** ([`ErrorNode`]): mergeable error values carrying a
//!   kind, a message, optional field-keyed children, and sibling history.
//!   Trees from independent checks combine into one without losing
//!   anything, deduplicated by identity rather than content.
//! - **Validators** ([`Validator`]): typed combinators over JSON values
//!   that coerce lenient input forms, run transform chains, and recurse
//!   through objects and arrays collecting *every* failure into a single
//!   error tree keyed by field path.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use stillwater::Validation;
//! use trellis::{messages, Validate, Validator};
//!
//! let signup = Validator::object()
//!     .field("email", Validator::string().trim().lowercase().email().required())
//!     .field("age", Validator::number().int().min(13.0).optional());
//!
//! match signup.validate(&json!({"email": " User@Example.COM ", "age": "21"})) {
//!     Validation::Success(Some(clean)) => {
//!         assert_eq!(clean, json!({"email": "user@example.com", "age": 21}));
//!     }
//!     _ => panic!("expected success"),
//! }
//!
//! match signup.validate(&json!({"email": "nope", "age": 9})) {
//!     Validation::Failure(err) => {
//!         let msgs = messages(&err);
//!         assert_eq!(
//!             msgs.get("email").unwrap().to_string(),
//!             "Please enter a valid e-mail address."
//!         );
//!         assert_eq!(msgs.get("age").unwrap().to_string(), "Value too small.");
//!     }
//!     _ => panic!("expected failure"),
//! }
//! ```
//!
//! Error trees also stand alone: build nodes with the [`ErrorNode`]
//! constructors and merge them with [`ErrorNode::combine`] and
//! [`ErrorNode::combine_at`] wherever independent failures need to be
//! reported together.

pub mod error;
pub mod path;
pub mod validator;

pub use error::{kind, messages, ErrorNode, MessageTree};
pub use path::{FieldPath, PathError};
pub use validator::{
    validator_fn, ArrayValidator, BooleanValidator, Chain, DateValidator, EnumValidator, Gate,
    NumberValidator, ObjectValidator, StringValidator, Strictness, TimeRef, Validate, Validated,
    Validator,
};
