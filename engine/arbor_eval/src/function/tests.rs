use super::builtins::{FalseFunction, StartsWithFunction};
use super::*;
use crate::{BasicContext, EvalErrorKind, Reference, TreeBuilder};
use arbor_ir::{BinaryOp, ParameterFlags};
use pretty_assertions::assert_eq;

fn echo(name: &str, parameters: Vec<Parameter>) -> BasicFunction {
    BasicFunction::new(name, parameters, |args, _| {
        let joined: Vec<String> = args.iter().map(ToString::to_string).collect();
        Ok(Value::text(joined.join(",")))
    })
}

fn numbers_of(args: &[Value]) -> Vec<f64> {
    args.iter()
        .filter_map(|v| match v {
            Value::Number(n) => Some(n.to_f64()),
            _ => None,
        })
        .collect()
}

fn sum() -> BasicFunction {
    BasicFunction::new(
        "sum",
        vec![Parameter::variable("values", ValueType::Number)],
        |args, _| Ok(Value::number(numbers_of(args).iter().sum::<f64>())),
    )
}

mod arity {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mixed() -> BasicFunction {
        echo(
            "mixed",
            vec![
                Parameter::required("a", ValueType::Any),
                Parameter::optional("b", ValueType::Any),
                Parameter::variable("rest", ValueType::Any),
            ],
        )
    }

    #[test]
    fn test_required_optional_variable() {
        let f = mixed();
        let err = f.check_parameter_count(0).unwrap_err();
        assert_eq!(
            err.kind,
            EvalErrorKind::Arity {
                function: "mixed".to_string(),
                got: 0,
                min: 1,
                max: None
            }
        );
        assert_eq!(err.to_string(), "mixed: Missing parameters, got 0 expected 1");
        for count in [1, 2, 3, 10] {
            assert!(f.check_parameter_count(count).is_ok(), "{count}");
        }
    }

    #[test]
    fn test_too_many() {
        let f = echo(
            "pair",
            vec![
                Parameter::required("a", ValueType::Any),
                Parameter::optional("b", ValueType::Any),
            ],
        );
        assert!(f.check_parameter_count(2).is_ok());
        let err = f.check_parameter_count(3).unwrap_err();
        assert_eq!(err.to_string(), "pair: Too many parameters, got 3 expected 2");
    }

    #[test]
    fn test_variable_must_be_last() {
        let f = echo(
            "bad",
            vec![
                Parameter::variable("xs", ValueType::Any),
                Parameter::required("last", ValueType::Any),
            ],
        );
        for count in [0, 1, 2] {
            let err = f.check_parameter_count(count).unwrap_err();
            assert!(
                matches!(err.kind, EvalErrorKind::InvalidParameters { .. }),
                "{count}: {err}"
            );
        }
        let b = TreeBuilder::new();
        let ctx = BasicContext::builder().function("bad", f).build();
        let err = crate::evaluate(&b.call("bad", &[b.text("x")]), &ctx).unwrap_err();
        assert_eq!(
            err.to_string(),
            "bad: variable parameter `xs` must be the last parameter"
        );
    }

    #[test]
    fn test_trailing_variable_is_reused() {
        let f = mixed();
        assert_eq!(f.parameter(1).unwrap().name.as_str(), "b");
        assert_eq!(f.parameter(2).unwrap().name.as_str(), "rest");
        assert_eq!(f.parameter(7).unwrap().name.as_str(), "rest");

        let fixed = echo("one", vec![Parameter::required("a", ValueType::Any)]);
        assert!(fixed.parameter(1).is_none());
    }
}

mod prepare {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ctx() -> BasicContext {
        BasicContext::builder()
            .reference("x", Value::number(4.0))
            .reference("name", Value::text("arbor"))
            .build()
    }

    #[test]
    fn test_flags_select_preparation() {
        let b = TreeBuilder::new();
        let f = echo(
            "f",
            vec![
                Parameter::required("resolved", ValueType::Any)
                    .with_flags(ParameterFlags::RESOLVE_REFERENCES),
                Parameter::required("raw", ValueType::Any).with_flags(ParameterFlags::UNEVALUATED),
                Parameter::required("key", ValueType::Reference),
                Parameter::required("value", ValueType::Any),
            ],
        );
        let raw = b.binary(BinaryOp::Add, &b.number(1.0), &b.number(2.0));
        let args = [b.reference("x"), raw.clone(), b.reference("x"), raw.clone()];
        let values = f.prepare_parameters(&args, &ctx()).unwrap();
        assert_eq!(
            values,
            vec![
                Value::number(4.0),
                Value::Expression(raw),
                Value::Reference(Reference::new("x")),
                Value::number(3.0),
            ]
        );
        // The argument expressions are untouched.
        assert_eq!(args[0].as_reference(), Some(Reference::new("x")));
    }

    #[test]
    fn test_converts_to_declared_type() {
        let b = TreeBuilder::new();
        let f = echo("f", vec![Parameter::required("n", ValueType::Integer)]);
        let values = f.prepare_parameters(&[b.text("5")], &ctx()).unwrap();
        assert_eq!(values, vec![Value::Integer(5)]);

        let err = f.prepare_parameters(&[b.text("five")], &ctx()).unwrap_err();
        assert_eq!(
            err.kind,
            EvalErrorKind::ParameterType {
                function: "f".to_string(),
                parameter: "n".to_string(),
                value: "five".to_string(),
                target: ValueType::Integer,
            }
        );
    }

    #[test]
    fn test_reference_to_typed_parameter_is_resolved() {
        let b = TreeBuilder::new();
        let f = echo("f", vec![Parameter::required("n", ValueType::Number)]);
        let values = f.prepare_parameters(&[b.reference("x")], &ctx()).unwrap();
        assert_eq!(values, vec![Value::number(4.0)]);
    }

    #[test]
    fn test_missing_reference() {
        let b = TreeBuilder::new();
        let f = echo(
            "f",
            vec![Parameter::required("v", ValueType::Any)
                .with_flags(ParameterFlags::RESOLVE_REFERENCES)],
        );
        let err = f.prepare_parameters(&[b.reference("nope")], &ctx()).unwrap_err();
        assert_eq!(
            err.kind,
            EvalErrorKind::UnknownReference {
                reference: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_variable_parameters_share_type() {
        let b = TreeBuilder::new();
        let values = sum()
            .prepare_parameters(&[b.text("1"), b.number(2.0), b.text("3.5")], &ctx())
            .unwrap();
        assert_eq!(numbers_of(&values), vec![1.0, 2.0, 3.5]);
    }
}

mod builtins {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_false() {
        let ctx = BasicContext::builder().build();
        assert_eq!(FalseFunction.apply(&[], &ctx).unwrap(), Value::Bool(false));
        assert_eq!(FalseFunction.return_type(), ValueType::Bool);
        assert!(FalseFunction.is_pure(&ctx));
    }

    #[test]
    fn test_starts_with_resolves_references() {
        let b = TreeBuilder::new();
        let ctx = BasicContext::builder()
            .reference("name", Value::text("arbor"))
            .build();
        let args = [b.reference("name"), b.text("arb")];
        let values = StartsWithFunction.prepare_parameters(&args, &ctx).unwrap();
        assert_eq!(values, vec![Value::text("arbor"), Value::text("arb")]);
        assert_eq!(
            StartsWithFunction.apply(&values, &ctx).unwrap(),
            Value::Bool(true)
        );
        let values = [Value::text("arbor"), Value::text("bor")];
        assert_eq!(
            StartsWithFunction.apply(&values, &ctx).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_starts_with_arity() {
        let ctx = BasicContext::builder().build();
        let err = StartsWithFunction
            .apply(&[Value::text("a")], &ctx)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "starts-with: Missing parameters, got 1 expected 2"
        );
    }
}

mod adapters {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_with_name() {
        let renamed = sum().with_name("total");
        assert_eq!(renamed.name().map(FunctionName::as_str), Some("total"));
        let strict = echo("one", vec![Parameter::required("a", ValueType::Any)]).with_name("uno");
        let err = strict.check_parameter_count(2).unwrap_err();
        assert_eq!(err.to_string(), "uno: Too many parameters, got 2 expected 1");
    }

    #[test]
    fn test_map_parameters() {
        let ctx = BasicContext::builder().build();
        let reversed = echo("f", vec![Parameter::variable("v", ValueType::Any)])
            .map_parameters(|args, _| Ok(args.iter().rev().cloned().collect()));
        let result = reversed
            .apply(&[Value::text("a"), Value::text("b")], &ctx)
            .unwrap();
        assert_eq!(result, Value::text("b,a"));
        assert_eq!(reversed.name().map(FunctionName::as_str), Some("f"));
    }

    #[test]
    fn test_filter_parameters() {
        let ctx = BasicContext::builder().build();
        let numbers_only = sum().filter_parameters(|value, _| value.is_numeric());
        let result = numbers_only
            .apply(
                &[Value::number(1.0), Value::text("x"), Value::number(2.0)],
                &ctx,
            )
            .unwrap();
        assert_eq!(result, Value::number(3.0));
    }

    #[test]
    fn test_purity_is_delegated() {
        let ctx = BasicContext::builder().build();
        assert!(sum().with_name("total").is_pure(&ctx));
        assert!(!sum().impure().with_name("total").is_pure(&ctx));
    }
}

mod lambda {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_apply_binds_parameters() {
        let b = TreeBuilder::new();
        let body = b.binary(BinaryOp::Multiply, &b.reference("x"), &b.reference("y"));
        let f = LambdaFunction::new(
            vec![
                Parameter::required("x", ValueType::Number),
                Parameter::required("y", ValueType::Number),
            ],
            body,
        );
        let ctx = BasicContext::builder()
            .reference("y", Value::number(100.0))
            .build();
        let result = f
            .apply(&[Value::number(3.0), Value::number(4.0)], &ctx)
            .unwrap();
        assert_eq!(result, Value::number(12.0));
        assert!(f.name().is_none());
    }

    #[test]
    fn test_unbound_references_reach_parent() {
        let b = TreeBuilder::new();
        let body = b.binary(BinaryOp::Add, &b.reference("x"), &b.reference("offset"));
        let f = LambdaFunction::new(vec![Parameter::required("x", ValueType::Number)], body);
        let ctx = BasicContext::builder()
            .reference("offset", Value::number(10.0))
            .build();
        assert_eq!(
            f.apply(&[Value::number(1.0)], &ctx).unwrap(),
            Value::number(11.0)
        );
    }

    #[test]
    fn test_purity_follows_called_functions() {
        let b = TreeBuilder::new();
        let ctx = BasicContext::builder()
            .function("sum", sum())
            .function("random", sum().impure().with_name("random"))
            .build();
        let pure = LambdaFunction::new(Vec::new(), b.call("sum", &[b.number(1.0)]));
        let impure = LambdaFunction::new(
            Vec::new(),
            b.call("sum", &[b.call("random", &[])]),
        );
        assert!(pure.is_pure(&ctx));
        assert!(!impure.is_pure(&ctx));
    }

    #[test]
    fn test_scoped_context_bindings() {
        let ctx = BasicContext::builder()
            .reference("outer", Value::number(5.0))
            .build();
        let mut scope = ScopedContext::new(&ctx, [(Reference::new("local"), Value::number(1.0))]);
        scope.bind("alias", Value::Reference(Reference::new("outer")));
        scope.bind("total", Value::function(sum()));

        assert_eq!(
            scope.reference(&Reference::new("local")).unwrap(),
            Some(Value::number(1.0))
        );
        assert_eq!(
            scope.reference(&Reference::new("alias")).unwrap(),
            Some(Value::number(5.0))
        );
        assert_eq!(
            scope.reference(&Reference::new("outer")).unwrap(),
            Some(Value::number(5.0))
        );
        assert!(scope.function(&FunctionName::new("total")).is_ok());
        assert!(scope.is_pure(&FunctionName::new("total")));
    }
}
