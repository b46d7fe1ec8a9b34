//! Binds argument tokens to a command's declared parameters.

use std::any::Any;
use std::borrow::Cow;

use crate::param::{ParameterSpec, Value};
use crate::registry::{ParseFailure, TypeRegistry};

/// Typed arguments aligned with a command's parameters.
///
/// Omitted optional parameters are `None`.
#[derive(Debug, Clone, Default)]
pub struct BoundArguments {
    values: Vec<Option<Value>>,
}

impl BoundArguments {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The value in slot `index`, or `None` if it was omitted.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index).and_then(Option::as_ref)
    }

    pub fn is_present(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    pub fn integer(&self, index: usize) -> Option<i64> {
        match self.get(index) {
            Some(Value::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    /// Text of a free-text or closed-set argument.
    pub fn text(&self, index: usize) -> Option<&str> {
        match self.get(index) {
            Some(Value::Text(s)) => Some(s),
            Some(Value::Choice { name, .. }) => Some(name),
            _ => None,
        }
    }

    /// Position of a closed-set argument within its set.
    pub fn choice(&self, index: usize) -> Option<usize> {
        match self.get(index) {
            Some(Value::Choice { index, .. }) => Some(*index),
            _ => None,
        }
    }

    /// Entity handle downcast to the type its resolver produced.
    pub fn entity<T: Any>(&self, index: usize) -> Option<&T> {
        match self.get(index) {
            Some(Value::Entity(handle)) => handle.downcast_ref::<T>(),
            _ => None,
        }
    }
}

/// Why binding stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindFailure {
    /// Too few or too many tokens.
    Count,
    /// The first parameter that failed to parse.
    Parse(ParseFailure),
}

/// Token count bounds for `specs`: `(min, max)`, with `max = None` when a
/// greedy parameter absorbs any surplus.
pub fn arity(specs: &[ParameterSpec]) -> (usize, Option<usize>) {
    let required = specs.iter().filter(|s| !s.is_optional()).count();
    let greedy = specs.last().is_some_and(ParameterSpec::is_greedy);
    (required, (!greedy).then_some(specs.len()))
}

/// Bind `tokens` to `specs`, parsing left to right.
///
/// Tokens past the non-greedy slots are joined with single spaces into the
/// greedy slot. The first parse failure stops binding; later slots are not
/// parsed.
pub fn bind<C>(
    specs: &[ParameterSpec],
    tokens: &[String],
    types: &TypeRegistry<C>,
    context: &C,
) -> Result<BoundArguments, BindFailure> {
    let (min, max) = arity(specs);
    if tokens.len() < min || max.is_some_and(|max| tokens.len() > max) {
        return Err(BindFailure::Count);
    }

    let fixed = match max {
        Some(_) => specs.len(),
        None => specs.len() - 1,
    };

    let mut values = Vec::with_capacity(specs.len());
    for (i, spec) in specs.iter().enumerate() {
        let token: Option<Cow<'_, str>> = if i < fixed {
            tokens.get(i).map(|t| Cow::Borrowed(t.as_str()))
        } else if tokens.len() > fixed {
            Some(Cow::Owned(tokens[fixed..].join(" ")))
        } else {
            None
        };
        let value = match token {
            Some(token) => Some(
                types
                    .parse(spec, &token, context)
                    .map_err(BindFailure::Parse)?,
            ),
            None => None,
        };
        values.push(value);
    }
    Ok(BoundArguments { values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::ParamType;
    use crate::registry::PERMISSION_LEVEL;

    fn types() -> TypeRegistry<()> {
        TypeRegistry::new().with_permission_levels()
    }

    fn toks(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    fn add3or4() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("num1", ParamType::Integer),
            ParameterSpec::required("num2", ParamType::Integer),
            ParameterSpec::required("num3", ParamType::Integer),
            ParameterSpec::optional("num4", ParamType::Integer),
        ]
    }

    fn add_user() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("name", ParamType::Text),
            ParameterSpec::required("permissionLevel", ParamType::choice(PERMISSION_LEVEL)),
            ParameterSpec::required("favoriteFood", ParamType::Text).greedy(),
        ]
    }

    #[test]
    fn exact_count_binds_in_order() {
        let args = bind(&add3or4()[..3], &toks("1 2 3"), &types(), &()).unwrap();
        assert_eq!(args.len(), 3);
        assert_eq!(args.integer(0), Some(1));
        assert_eq!(args.integer(2), Some(3));
    }

    #[test]
    fn omitted_optional_is_absent() {
        let args = bind(&add3or4(), &toks("1 2 3"), &types(), &()).unwrap();
        assert_eq!(args.len(), 4);
        assert!(!args.is_present(3));
        assert_eq!(args.integer(3), None);
    }

    #[test]
    fn supplied_optional_is_bound() {
        let args = bind(&add3or4(), &toks("1 2 3 4"), &types(), &()).unwrap();
        assert_eq!(args.integer(3), Some(4));
    }

    #[test]
    fn count_outside_bounds_fails() {
        assert_eq!(bind(&add3or4(), &toks("1 2"), &types(), &()).unwrap_err(), BindFailure::Count);
        assert_eq!(
            bind(&add3or4(), &toks("1 2 3 4 5"), &types(), &()).unwrap_err(),
            BindFailure::Count
        );
        assert_eq!(bind(&[], &toks("x"), &types(), &()).unwrap_err(), BindFailure::Count);
    }

    #[test]
    fn no_params_no_tokens() {
        assert!(bind(&[], &[], &types(), &()).unwrap().is_empty());
    }

    #[test]
    fn greedy_joins_surplus() {
        let args = bind(&add_user(), &toks("Jimmy DefaultUser baked potatoes"), &types(), &()).unwrap();
        assert_eq!(args.text(0), Some("Jimmy"));
        assert_eq!(args.text(1), Some("DefaultUser"));
        assert_eq!(args.choice(1), Some(1));
        assert_eq!(args.text(2), Some("baked potatoes"));
    }

    #[test]
    fn greedy_single_token() {
        let args = bind(&add_user(), &toks("Jimmy Guest soup"), &types(), &()).unwrap();
        assert_eq!(args.text(2), Some("soup"));
    }

    #[test]
    fn required_greedy_needs_a_token() {
        assert_eq!(
            bind(&add_user(), &toks("Jimmy Guest"), &types(), &()).unwrap_err(),
            BindFailure::Count
        );
    }

    #[test]
    fn optional_greedy_may_be_empty() {
        let specs = vec![
            ParameterSpec::required("who", ParamType::Text),
            ParameterSpec::optional("message", ParamType::Text).greedy(),
        ];
        let args = bind(&specs, &toks("Jeff"), &types(), &()).unwrap();
        assert!(!args.is_present(1));
        let args = bind(&specs, &toks("Jeff see you  soon"), &types(), &()).unwrap();
        assert_eq!(args.text(1), Some("see you soon"));
    }

    #[test]
    fn greedy_keeps_whitespace_inside_quoted_tokens() {
        let tokens = vec!["a".to_string(), "b  c".to_string(), "d".to_string()];
        let specs = vec![ParameterSpec::required("all", ParamType::Text).greedy()];
        let args = bind(&specs, &tokens, &types(), &()).unwrap();
        assert_eq!(args.text(0), Some("a b  c d"));
    }

    #[test]
    fn first_failure_wins() {
        let specs = vec![
            ParameterSpec::required("num1", ParamType::Integer),
            ParameterSpec::required("num2", ParamType::Integer),
        ];
        assert_eq!(
            bind(&specs, &toks("x y"), &types(), &()).unwrap_err(),
            BindFailure::Parse(ParseFailure::Syntax("num1 must be a whole number!".to_string()))
        );
        assert_eq!(
            bind(&specs, &toks("1 bleh"), &types(), &()).unwrap_err(),
            BindFailure::Parse(ParseFailure::Syntax("num2 must be a whole number!".to_string()))
        );
    }

    #[test]
    fn greedy_slot_is_parsed_as_a_whole() {
        let specs = vec![ParameterSpec::required("n", ParamType::Integer).greedy()];
        assert!(bind(&specs, &toks("1 2"), &types(), &()).is_err());
        assert_eq!(bind(&specs, &toks("12"), &types(), &()).unwrap().integer(0), Some(12));
    }

    #[test]
    fn entity_accessor_downcasts() {
        let types: TypeRegistry<()> =
            TypeRegistry::new().entity("user", |_: &(), token| Ok(Value::entity(token.len())));
        let specs = vec![ParameterSpec::required("user", ParamType::entity("user"))];
        let args = bind(&specs, &toks("Blake"), &types, &()).unwrap();
        assert_eq!(args.entity::<usize>(0), Some(&5));
        assert_eq!(args.entity::<String>(0), None);
        assert_eq!(args.text(0), None);
    }

    #[test]
    fn arity_bounds() {
        assert_eq!(arity(&add3or4()), (3, Some(4)));
        assert_eq!(arity(&add_user()), (3, None));
        assert_eq!(arity(&[]), (0, Some(0)));
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        fn specs(required: usize, optional: usize) -> Vec<ParameterSpec> {
            (0..required)
                .map(|i| ParameterSpec::required(format!("r{i}"), ParamType::Integer))
                .chain((0..optional).map(|i| ParameterSpec::optional(format!("o{i}"), ParamType::Integer)))
                .collect()
        }

        proptest! {
            #[test]
            fn count_check_matches_bounds(required in 0usize..4, optional in 0usize..3, supplied in 0usize..9) {
                let specs = specs(required, optional);
                let tokens: Vec<String> = (0..supplied).map(|n| n.to_string()).collect();
                let result = bind(&specs, &tokens, &types(), &());
                if supplied < required || supplied > required + optional {
                    prop_assert_eq!(result.unwrap_err(), BindFailure::Count);
                } else {
                    let args = result.unwrap();
                    prop_assert_eq!(args.len(), specs.len());
                    for i in 0..specs.len() {
                        prop_assert_eq!(args.integer(i), (i < supplied).then_some(i as i64));
                    }
                }
            }

            #[test]
            fn greedy_accepts_any_surplus(words in proptest::collection::vec("[a-z]{1,5}", 1..10)) {
                let specs = vec![
                    ParameterSpec::required("first", ParamType::Text),
                    ParameterSpec::optional("rest", ParamType::Text).greedy(),
                ];
                let args = bind(&specs, &words, &types(), &()).unwrap();
                prop_assert_eq!(args.text(0), Some(words[0].as_str()));
                if words.len() > 1 {
                    let joined = words[1..].join(" ");
                    prop_assert_eq!(args.text(1), Some(joined.as_str()));
                } else {
                    prop_assert!(!args.is_present(1));
                }
            }
        }
    }
}
