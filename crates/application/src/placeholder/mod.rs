//! Placeholder parsing and resolution
//!
//! Replaces `${name}` style placeholders in text with values from a
//! [`PlaceholderResolver`](crate::ports::PlaceholderResolver).
//!
//! # Usage
//!
//! ```
//! use std::collections::HashMap;
//! use stencil_application::placeholder::PlaceholderHelper;
//! use stencil_domain::placeholder::PlaceholderSyntax;
//!
//! let helper = PlaceholderHelper::new(PlaceholderSyntax::standard());
//! let values = HashMap::from([
//!     ("env".to_string(), "prod".to_string()),
//!     ("prod.host".to_string(), "db.internal".to_string()),
//! ]);
//!
//! // Keys can be built from other placeholders
//! let result = helper.replace_placeholders("jdbc://${${env}.host}/app", &values);
//! assert_eq!(result.unwrap(), "jdbc://db.internal/app");
//! ```

pub mod engine;
pub mod parser;

pub use engine::PlaceholderHelper;
pub use parser::parse;
