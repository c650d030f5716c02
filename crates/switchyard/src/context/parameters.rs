use std::collections::HashMap;

use crate::argument::Parameter;
use crate::convert::FromArg;
use crate::error::{CommandError, ConversionError};

/// Positional values bound during resolution.
///
/// Fixed parameters are bound at most once, in declaration order. Values
/// left over after every fixed parameter is bound go to the variadic list,
/// in the order they were given.
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    bound: HashMap<Parameter, String>,
    variadic: Vec<String>,
}

impl Parameters {
    /// Binds `value` to `parameter` unless it already has one.
    ///
    /// Returns whether the value was bound.
    pub(crate) fn bind(&mut self, parameter: &Parameter, value: impl Into<String>) -> bool {
        if self.bound.contains_key(parameter) {
            return false;
        }
        self.bound.insert(parameter.clone(), value.into());
        true
    }

    pub(crate) fn push_variadic(&mut self, value: impl Into<String>) {
        self.variadic.push(value.into());
    }

    pub fn has_value(&self, parameter: &Parameter) -> bool {
        self.bound.contains_key(parameter)
    }

    /// The bound string, unconverted.
    pub fn raw(&self, parameter: &Parameter) -> Option<&str> {
        self.bound.get(parameter).map(String::as_str)
    }

    /// The bound value converted to `T`, or `None` when the parameter was
    /// not given.
    pub fn value<T: FromArg>(&self, parameter: &Parameter) -> Result<Option<T>, ConversionError> {
        self.raw(parameter).map(T::convert).transpose()
    }

    /// Like [`value`](Self::value), but a missing parameter is an error.
    pub fn required<T: FromArg>(&self, parameter: &Parameter) -> Result<T, CommandError> {
        self.value(parameter)?
            .ok_or_else(|| CommandError::MissingParameter(parameter.clone()))
    }

    /// The variadic value at `index`, or `None` past the end.
    pub fn variadic_value<T: FromArg>(&self, index: usize) -> Result<Option<T>, ConversionError> {
        self.variadic
            .get(index)
            .map(|value| T::convert(value))
            .transpose()
    }

    /// Every variadic value converted to `T`. Fails on the first value
    /// that does not convert.
    pub fn variadic_values<T: FromArg>(&self) -> Result<Vec<T>, ConversionError> {
        self.variadic.iter().map(|value| T::convert(value)).collect()
    }

    /// The variadic values, unconverted.
    pub fn variadic_raw(&self) -> &[String] {
        &self.variadic
    }

    pub fn variadic_len(&self) -> usize {
        self.variadic.len()
    }

    pub fn has_variadic_values(&self) -> bool {
        !self.variadic.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameter(name: &str) -> Parameter {
        Parameter::new(name, "")
    }

    #[test]
    fn binds_once() {
        let mut parameters = Parameters::default();
        let number = parameter("number");

        assert!(parameters.bind(&number, "1234"));
        assert!(!parameters.bind(&number, "5678"));
        assert_eq!(parameters.raw(&number), Some("1234"));
        assert!(parameters.has_value(&number));
    }

    #[test]
    fn typed_values() {
        let mut parameters = Parameters::default();
        let number = parameter("number");
        parameters.bind(&number, "1234");

        assert_eq!(parameters.value::<i64>(&number), Ok(Some(1234)));
        assert_eq!(parameters.value::<i64>(&parameter("other")), Ok(None));
        assert!(parameters.value::<bool>(&number).is_err());
    }

    #[test]
    fn required_reports_missing_parameter() {
        let parameters = Parameters::default();
        let err = parameters.required::<String>(&parameter("file")).unwrap_err();
        assert!(matches!(err, CommandError::MissingParameter(p) if p.name() == "file"));
    }

    #[test]
    fn required_reports_conversion_failure() {
        let mut parameters = Parameters::default();
        let count = parameter("count");
        parameters.bind(&count, "many");
        let err = parameters.required::<u32>(&count).unwrap_err();
        assert!(matches!(err, CommandError::Conversion(_)));
    }

    #[test]
    fn variadic_values_keep_order() {
        let mut parameters = Parameters::default();
        for value in ["3", "1", "2"] {
            parameters.push_variadic(value);
        }

        assert_eq!(parameters.variadic_len(), 3);
        assert!(parameters.has_variadic_values());
        assert_eq!(parameters.variadic_values::<u8>(), Ok(vec![3, 1, 2]));
        assert_eq!(parameters.variadic_value::<u8>(1), Ok(Some(1)));
        assert_eq!(parameters.variadic_value::<u8>(3), Ok(None));
    }

    #[test]
    fn variadic_conversion_stops_at_first_failure() {
        let mut parameters = Parameters::default();
        parameters.push_variadic("1");
        parameters.push_variadic("two");
        let err = parameters.variadic_values::<i32>().unwrap_err();
        assert_eq!(err.source_text(), "two");
        assert_eq!(parameters.variadic_raw(), &["1", "two"]);
    }
}
