//! Drag-to-scroll for browser DOM elements.
//!
//! On `wasm32` this crate provides `WebHost`, a `web-sys` backed
//! [`Host`](dragscroll_core::Host), and a small JavaScript API (`bindSelector`,
//! `unbind`, `unbindAll`). Everything else is target independent.

#[cfg(target_arch = "wasm32")]
mod dom;

#[cfg(target_arch = "wasm32")]
pub use dom::{WebHost, bind_selector, unbind, unbind_all};

use dragscroll_core::{BindError, ConfigError, HandleSelector};
use thiserror::Error;

/// Errors surfaced to JavaScript callers.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("No document available")]
    NoDocument,
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
    #[error("Drag runtime is busy dispatching an event")]
    Busy,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Bind(#[from] BindError),
}

/// The `querySelectorAll` string that resolves `selector` relative to a bound element.
///
/// A leading `>` is anchored with `:scope`, which `querySelectorAll` requires for
/// child combinators.
pub fn scoped_query(selector: &HandleSelector) -> String {
    match selector {
        HandleSelector::FirstChild => ":scope > :first-child".to_string(),
        HandleSelector::Css(css) => {
            let css = css.trim();
            if css.starts_with('>') {
                format!(":scope {}", css)
            } else {
                css.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_child_query() {
        assert_eq!(scoped_query(&HandleSelector::FirstChild), ":scope > :first-child");
    }

    #[test]
    fn test_child_combinator_is_scoped() {
        assert_eq!(scoped_query(&HandleSelector::css("> .grip")), ":scope > .grip");
        assert_eq!(scoped_query(&HandleSelector::css("  .grip img ")), ".grip img");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(WebError::InvalidSelector("??".into()).to_string(), "Invalid selector: ??");
        assert_eq!(
            WebError::from(ConfigError::EmptySelector).to_string(),
            "Handle selector is empty"
        );
    }
}
