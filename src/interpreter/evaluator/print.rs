use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        scope::ScopeRef,
        value::core::Value,
    },
};

impl Context {
    /// Writes a value as one line of program output.
    ///
    /// Strings are written as they are, other values through their
    /// `description` method. Every `<name>` in the text is replaced by the
    /// description of the variable `name` visible from `scope`.
    ///
    /// # Errors
    /// - `RuntimeError::UndeclaredVariable` if a referenced name is not
    ///   declared.
    /// - `RuntimeError::Io` if writing fails.
    pub fn print_value(&mut self, value: &Value, scope: &ScopeRef, line: usize) -> EvalResult<()> {
        let text = match value {
            Value::String(text) => text.clone(),
            other => self.describe(other, line)?,
        };
        let text = self.interpolate(&text, scope, line)?;

        writeln!(self.output(), "{text}").map_err(|source| RuntimeError::Io { source, line })
    }

    /// Describes a value by sending it `description`.
    pub(crate) fn describe(&mut self, value: &Value, line: usize) -> EvalResult<String> {
        let mut receiver = value.clone();
        match self.send(&mut receiver, "description", &[], line)? {
            Value::String(text) => Ok(text),
            other => Ok(other.describe()),
        }
    }

    /// Replaces each `<name>` whose `name` is an identifier with the
    /// description of that variable.
    fn interpolate(&mut self, text: &str, scope: &ScopeRef, line: usize) -> EvalResult<String> {
        let mut result = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(open) = rest.find('<') {
            result.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            match after.find('>') {
                Some(close) if is_identifier(&after[..close]) => {
                    let value = scope.get(&after[..close], line)?;
                    result.push_str(&self.describe(&value, line)?);
                    rest = &after[close + 1..];
                },
                _ => {
                    result.push('<');
                    rest = after;
                },
            }
        }

        result.push_str(rest);
        Ok(result)
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next()
         .is_some_and(|first| first.is_ascii_lowercase() || first == '_')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
