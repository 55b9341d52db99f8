use super::*;
use crate::{BasicFunction, EvalErrorKind};
use arbor_num::RoundingMode;
use pretty_assertions::assert_eq;

fn constant(name: &str, value: f64) -> BasicFunction {
    BasicFunction::new(name, Vec::new(), move |_, _| Ok(Value::number(value)))
}

#[test]
fn test_builder_defaults() {
    let ctx = BasicContext::builder().build();
    assert_eq!(ctx.number_kind(), NumberKind::Floating);
    assert_eq!(ctx.math_context(), MathContext::DECIMAL128);
    assert!(ctx.functions().is_empty());
}

#[test]
fn test_builder_settings() {
    let ctx = BasicContext::builder()
        .number_kind(NumberKind::ArbitraryPrecision)
        .math_context(MathContext::DECIMAL32)
        .build();
    assert_eq!(ctx.number_kind(), NumberKind::ArbitraryPrecision);
    assert_eq!(ctx.math_context().precision(), 7);
}

#[test]
fn test_reference_lookup() {
    let ctx = BasicContext::builder()
        .reference("x", Value::number(2.0))
        .build();
    assert_eq!(
        ctx.reference(&Reference::new("x")).unwrap(),
        Some(Value::number(2.0))
    );
    assert_eq!(ctx.reference(&Reference::new("y")).unwrap(), None);
}

#[test]
fn test_function_lookup() {
    let ctx = BasicContext::builder()
        .function("half", constant("half", 0.5))
        .build();
    let half = ctx.function(&FunctionName::new("half")).unwrap();
    assert_eq!(half.name().map(FunctionName::as_str), Some("half"));

    let err = ctx.function(&FunctionName::new("tau")).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UnknownFunction {
            name: "tau".to_string()
        }
    );
    assert_eq!(err.to_string(), "unknown function: tau");
}

#[test]
fn test_function_valued_reference_is_callable() {
    let ctx = BasicContext::builder()
        .reference("f", Value::function(constant("one", 1.0)))
        .build();
    assert!(ctx.function(&FunctionName::new("f")).is_ok());
    // Plain values are not.
    let ctx = BasicContext::builder()
        .reference("f", Value::number(1.0))
        .build();
    assert!(ctx.function(&FunctionName::new("f")).is_err());
}

#[test]
fn test_purity() {
    let ctx = BasicContext::builder()
        .function("pure", constant("pure", 1.0))
        .function("random", constant("random", 0.5).impure())
        .build();
    assert!(ctx.is_pure(&FunctionName::new("pure")));
    assert!(!ctx.is_pure(&FunctionName::new("random")));
    assert!(!ctx.is_pure(&FunctionName::new("missing")));
}

#[test]
fn test_default_truthiness() {
    let ctx = BasicContext::builder()
        .reference("empty", Value::text(""))
        .build();
    assert!(!ctx.is_truthy(&Value::number(0.0)).unwrap());
    assert!(ctx.is_truthy(&Value::number(-2.0)).unwrap());
    assert!(!ctx.is_truthy(&Value::Integer(0)).unwrap());
    assert!(!ctx.is_truthy(&Value::text("")).unwrap());
    assert!(ctx.is_truthy(&Value::text("x")).unwrap());
    assert!(!ctx.is_truthy(&Value::Reference(Reference::new("empty"))).unwrap());

    let err = ctx
        .is_truthy(&Value::Reference(Reference::new("missing")))
        .unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::UnknownReference { .. }));
}

#[test]
fn test_truthiness_override() {
    let ctx = BasicContext::builder()
        .truthiness(|value| matches!(value, Value::Bool(true)))
        .build();
    assert!(!ctx.is_truthy(&Value::number(5.0)).unwrap());
    assert!(ctx.is_truthy(&Value::Bool(true)).unwrap());
}

#[test]
fn test_default_ordering() {
    assert_eq!(
        default_ordering(&Value::text("a"), &Value::text("b")),
        Some(Ordering::Less)
    );
    assert_eq!(
        default_ordering(&Value::Bool(true), &Value::Bool(false)),
        Some(Ordering::Greater)
    );
    assert_eq!(default_ordering(&Value::text("a"), &Value::Bool(true)), None);
}

#[test]
fn test_convert_uses_context_kind() {
    let ctx = BasicContext::builder()
        .number_kind(NumberKind::ArbitraryPrecision)
        .build();
    let Value::Number(n) = ctx.convert(Value::text("1.5"), ValueType::Number).unwrap() else {
        panic!("expected a number");
    };
    assert_eq!(n.kind(), NumberKind::ArbitraryPrecision);
}

mod from_env {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        let config = ContextConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ContextConfig::default());
    }

    #[test]
    fn test_reads_kind_and_precision() {
        let config = ContextConfig::from_lookup(lookup(&[
            ("ARBOR_NUMBER_KIND", "decimal"),
            ("ARBOR_PRECISION", " 12 "),
        ]))
        .unwrap();
        assert_eq!(config.number_kind, NumberKind::ArbitraryPrecision);
        assert_eq!(config.math_context.precision(), 12);
        assert_eq!(config.math_context.rounding(), RoundingMode::HalfEven);
    }

    #[test]
    fn test_invalid_values() {
        for vars in [
            [("ARBOR_PRECISION", "many")],
            [("ARBOR_PRECISION", "0")],
            [("ARBOR_NUMBER_KIND", "quantum")],
        ] {
            let err = ContextConfig::from_lookup(lookup(&vars)).unwrap_err();
            assert!(
                matches!(err.kind, EvalErrorKind::InvalidConfig { .. }),
                "{vars:?}: {err}"
            );
        }
    }

    #[test]
    fn test_builder_accepts_config() {
        let config = ContextConfig {
            number_kind: NumberKind::ArbitraryPrecision,
            math_context: MathContext::DECIMAL64,
        };
        let ctx = BasicContext::builder().config(config).build();
        assert_eq!(ctx.config(), config);
    }
}
