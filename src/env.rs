//! Environment variable lookup and `${VAR}` interpolation.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use crate::error::{DsnError, DsnResult};

/// Something variables can be looked up in.
///
/// Implemented for the process environment ([`ProcessEnv`]) and for any
/// `HashMap` keyed by strings, which is what tests use.
pub trait EnvSource {
    /// The value of `name`, if set.
    fn var(&self, name: &str) -> Option<String>;

    /// The value of `name`, treating an empty value as unset.
    fn non_empty_var(&self, name: &str) -> Option<String> {
        self.var(name).filter(|v| !v.is_empty())
    }
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<K, V, H> EnvSource for HashMap<K, V, H>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
    H: BuildHasher,
{
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).map(|v| v.as_ref().to_string())
    }
}

/// Replace `${...}` references in `input` with values from `source`.
///
/// - `${VAR}`: required; unset or empty is [`DsnError::EnvNotFound`]
/// - `${VAR:-default}`: `default` when `VAR` is unset or empty
/// - `${VAR:?message}`: required, failing with `message`
/// - `$$`: a literal `$`
///
/// Any other `$` is kept as is. Substituted values are never expanded again.
pub fn expand<S: EnvSource + ?Sized>(input: &str, source: &S) -> DsnResult<String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('$') {
            out.push('$');
            rest = tail;
        } else if let Some(body) = after.strip_prefix('{') {
            let end = body
                .find('}')
                .ok_or_else(|| DsnError::InvalidEnvSyntax("unterminated `${`".to_string()))?;
            out.push_str(&lookup(&body[..end], source)?);
            rest = &body[end + 1..];
        } else {
            out.push('$');
            rest = after;
        }
    }

    out.push_str(rest);
    Ok(out)
}

fn lookup<S: EnvSource + ?Sized>(reference: &str, source: &S) -> DsnResult<String> {
    let (name, modifier) = match reference.split_once(':') {
        Some((name, modifier)) => (name, Some(modifier)),
        None => (reference, None),
    };

    if name.is_empty() {
        return Err(DsnError::InvalidEnvSyntax("empty variable name".to_string()));
    }
    if let Some(value) = source.non_empty_var(name) {
        return Ok(value);
    }

    match modifier {
        None | Some("?") => Err(DsnError::EnvNotFound(name.to_string())),
        Some(m) => match (m.strip_prefix('-'), m.strip_prefix('?')) {
            (Some(default), _) => Ok(default.to_string()),
            (_, Some(message)) => Err(DsnError::InvalidEnvSyntax(format!("{name}: {message}"))),
            _ => Err(DsnError::InvalidEnvSyntax(format!(
                "unsupported modifier `:{m}` for `{name}`"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([("HOST", "localhost"), ("PORT", "5432"), ("EMPTY", "")])
    }

    #[test]
    fn test_expand_braced() {
        assert_eq!(
            expand("${HOST}:${PORT}", &vars()).unwrap(),
            "localhost:5432"
        );
    }

    #[test]
    fn test_expand_default() {
        let vars = vars();
        assert_eq!(expand("${HOST:-other}", &vars).unwrap(), "localhost");
        assert_eq!(expand("${MISSING:-other}", &vars).unwrap(), "other");
        assert_eq!(expand("${EMPTY:-other}", &vars).unwrap(), "other");
        assert_eq!(expand("${MISSING:-}", &vars).unwrap(), "");
    }

    #[test]
    fn test_expand_required_message() {
        let err = expand("${MISSING:?set MISSING}", &vars()).unwrap_err();
        assert!(err.to_string().contains("set MISSING"));
    }

    #[test]
    fn test_expand_missing() {
        assert!(matches!(
            expand("${MISSING}", &vars()),
            Err(DsnError::EnvNotFound(name)) if name == "MISSING"
        ));
        assert!(matches!(
            expand("${EMPTY}", &vars()),
            Err(DsnError::EnvNotFound(_))
        ));
    }

    #[test]
    fn test_bare_dollar_is_literal() {
        let vars = vars();
        assert_eq!(expand("pa$word", &vars).unwrap(), "pa$word");
        assert_eq!(expand("$HOST", &vars).unwrap(), "$HOST");
        assert_eq!(expand("cost: $5", &vars).unwrap(), "cost: $5");
        assert_eq!(expand("trailing $", &vars).unwrap(), "trailing $");
        assert_eq!(expand("$${HOST}", &vars).unwrap(), "${HOST}");
    }

    #[test]
    fn test_values_are_not_reexpanded() {
        let vars = HashMap::from([("A", "${B}"), ("B", "b")]);
        assert_eq!(expand("${A}", &vars).unwrap(), "${B}");
    }

    #[test]
    fn test_invalid_syntax() {
        for input in ["${HOST", "${}", "${MISSING:+x}"] {
            assert!(
                matches!(expand(input, &vars()), Err(DsnError::InvalidEnvSyntax(_))),
                "{input}"
            );
        }
    }
}
