use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::errors::EvalNote;
use crate::{
    BasicContext, BasicFunction, EvalErrorKind, ExpressionFunction, FunctionRegistry, Parameter,
    TreeBuilder,
};
use arbor_ir::{BinaryOp, UnaryOp};
use arbor_num::BigDecimal;
use pretty_assertions::assert_eq;

fn floating() -> BasicContext {
    BasicContext::builder().build()
}

fn decimal() -> BasicContext {
    BasicContext::builder()
        .number_kind(NumberKind::ArbitraryPrecision)
        .build()
}

fn decimal_number(text: &str) -> Value {
    Value::Number(ExprNumber::ArbitraryPrecision(text.parse::<BigDecimal>().unwrap()))
}

mod values {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_literal_takes_context_kind() {
        let b = TreeBuilder::new();
        let n = b.number(0.5);
        let Value::Number(result) = evaluate(&n, &decimal()).unwrap() else {
            panic!("expected a number");
        };
        assert_eq!(result.kind(), NumberKind::ArbitraryPrecision);
        assert_eq!(evaluate(&n, &floating()).unwrap(), Value::number(0.5));
        assert_eq!(evaluate(&b.text("hi"), &floating()).unwrap(), Value::text("hi"));
    }

    #[test]
    fn test_reference() {
        let b = TreeBuilder::new();
        let stored = b.binary(BinaryOp::Add, &b.number(1.0), &b.number(1.0));
        let ctx = BasicContext::builder()
            .reference("x", Value::number(7.0))
            .reference("formula", Value::Expression(stored))
            .build();
        assert_eq!(evaluate(&b.reference("x"), &ctx).unwrap(), Value::number(7.0));
        assert_eq!(
            evaluate(&b.reference("formula"), &ctx).unwrap(),
            Value::number(2.0)
        );
        let err = evaluate(&b.reference("y"), &ctx).unwrap_err();
        assert_eq!(err.to_string(), "unknown reference: y");
    }
}

mod operators {
    use super::*;
    use pretty_assertions::assert_eq;

    fn eval_binary(op: BinaryOp, left: Value, right: Value, ctx: &BasicContext) -> EvalResult {
        let ctx = BasicContext::builder()
            .config(ctx.config())
            .reference("l", left)
            .reference("r", right)
            .build();
        let b = TreeBuilder::new();
        evaluate(&b.binary(op, &b.reference("l"), &b.reference("r")), &ctx)
    }

    #[test]
    fn test_arithmetic() {
        let b = TreeBuilder::new();
        let expr = b.binary(
            BinaryOp::Subtract,
            &b.binary(BinaryOp::Multiply, &b.number(3.0), &b.number(4.0)),
            &b.number(2.0),
        );
        assert_eq!(evaluate(&expr, &floating()).unwrap(), Value::number(10.0));
        assert_eq!(evaluate(&expr, &decimal()).unwrap(), decimal_number("10"));
    }

    #[test]
    fn test_integer_operands_promote() {
        let sum = eval_binary(BinaryOp::Add, Value::Integer(2), Value::number(0.5), &floating());
        assert_eq!(sum.unwrap(), Value::number(2.5));
        let sum = eval_binary(BinaryOp::Add, Value::Integer(2), Value::Integer(3), &decimal());
        assert_eq!(sum.unwrap(), decimal_number("5"));
    }

    #[test]
    fn test_division_by_zero() {
        let err = eval_binary(BinaryOp::Divide, Value::number(1.0), Value::number(0.0), &decimal())
            .unwrap_err();
        assert!(matches!(err.kind, EvalErrorKind::DivisionByZero { .. }));

        let inf = eval_binary(BinaryOp::Divide, Value::number(1.0), Value::number(0.0), &floating());
        assert_eq!(inf.unwrap(), Value::number(f64::INFINITY));
    }

    #[test]
    fn test_text_concatenation() {
        let joined = eval_binary(BinaryOp::Add, Value::text("a"), Value::number(1.0), &floating());
        assert_eq!(joined.unwrap(), Value::text("a1"));
        let joined = eval_binary(BinaryOp::Add, Value::Bool(true), Value::text("!"), &floating());
        assert_eq!(joined.unwrap(), Value::text("true!"));
    }

    #[test]
    fn test_type_mismatch() {
        let err = eval_binary(BinaryOp::Multiply, Value::text("a"), Value::number(2.0), &floating())
            .unwrap_err();
        assert_eq!(
            err.kind,
            EvalErrorKind::TypeMismatch {
                operator: "*".to_string(),
                left: "text",
                right: Some("number"),
            }
        );
        let err = eval_binary(BinaryOp::Lt, Value::text("a"), Value::number(2.0), &floating())
            .unwrap_err();
        assert!(matches!(err.kind, EvalErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn test_comparison() {
        let cases = [
            (BinaryOp::Lt, Value::Integer(1), Value::number(1.5), true),
            (BinaryOp::Eq, Value::number(2.0), Value::Integer(2), true),
            (BinaryOp::Ne, Value::number(2.0), Value::Integer(2), false),
            (BinaryOp::Ge, Value::text("b"), Value::text("a"), true),
            (BinaryOp::Eq, Value::Bool(true), Value::Bool(false), false),
        ];
        for (op, left, right, expected) in cases {
            let result = eval_binary(op, left.clone(), right.clone(), &floating()).unwrap();
            assert_eq!(result, Value::Bool(expected), "{left} {op} {right}");
        }
        let mixed = eval_binary(BinaryOp::Eq, Value::number(0.1), decimal_number("0.1"), &decimal());
        assert_eq!(mixed.unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_logical() {
        let and = eval_binary(BinaryOp::And, Value::Bool(true), Value::text(""), &floating());
        assert_eq!(and.unwrap(), Value::Bool(false));
        let or = eval_binary(BinaryOp::Or, Value::Bool(false), Value::number(3.0), &floating());
        assert_eq!(or.unwrap(), Value::Bool(true));
        let xor = eval_binary(BinaryOp::Xor, Value::Bool(true), Value::Bool(true), &floating());
        assert_eq!(xor.unwrap(), Value::Bool(false));
        let text = eval_binary(BinaryOp::And, Value::text("a"), Value::text("b"), &floating());
        assert_eq!(text.unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_logical_numbers_are_bitwise() {
        let and = eval_binary(BinaryOp::And, Value::number(6.0), Value::number(3.0), &decimal());
        assert_eq!(and.unwrap(), decimal_number("2"));
        let or = eval_binary(BinaryOp::Or, Value::Integer(6), Value::Integer(3), &floating());
        assert_eq!(or.unwrap(), Value::number(7.0));
    }

    #[test]
    fn test_integer_power_does_not_wrap() {
        let power = |base, exponent, ctx: &BasicContext| {
            eval_binary(BinaryOp::Power, Value::Integer(base), Value::Integer(exponent), ctx)
        };
        assert_eq!(power(2, 64, &decimal()).unwrap(), decimal_number("18446744073709551616"));
        assert_eq!(power(3, 40, &decimal()).unwrap(), decimal_number("12157665459056928801"));

        assert_eq!(power(2, 64, &floating()).unwrap(), Value::number(2f64.powi(64)));
        let Value::Number(n) = power(3, 40, &floating()).unwrap() else {
            panic!("expected a number");
        };
        assert!((n.to_f64() - 1.215_766_545_905_692_9e19).abs() < 1.0e4, "{n}");
    }

    #[test]
    fn test_unary() {
        let b = TreeBuilder::new();
        let neg = b.unary(UnaryOp::Negate, &b.number(2.5));
        assert_eq!(evaluate(&neg, &floating()).unwrap(), Value::number(-2.5));
        assert_eq!(evaluate(&neg, &decimal()).unwrap(), decimal_number("-2.5"));

        let not = b.unary(UnaryOp::Not, &b.number(0.0));
        assert_eq!(evaluate(&not, &floating()).unwrap(), Value::Bool(true));

        let err = evaluate(&b.unary(UnaryOp::Negate, &b.text("x")), &floating()).unwrap_err();
        assert_eq!(err.to_string(), "operator `-` cannot be applied to text");
    }
}

mod calls {
    use super::*;
    use pretty_assertions::assert_eq;

    static CALLS: AtomicUsize = AtomicUsize::new(0);

    fn counting(result: bool) -> BasicFunction {
        BasicFunction::new(if result { "yes" } else { "no" }, Vec::new(), move |_, _| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Bool(result))
        })
        .impure()
    }

    #[test]
    fn test_logical_operators_evaluate_both_sides() {
        let ctx = BasicContext::builder()
            .function("yes", counting(true))
            .function("no", counting(false))
            .build();
        let b = TreeBuilder::new();
        let before = CALLS.load(Ordering::SeqCst);
        let and = b.binary(BinaryOp::And, &b.call("no", &[]), &b.call("yes", &[]));
        let or = b.binary(BinaryOp::Or, &b.call("yes", &[]), &b.call("no", &[]));
        assert_eq!(evaluate(&and, &ctx).unwrap(), Value::Bool(false));
        assert_eq!(evaluate(&or, &ctx).unwrap(), Value::Bool(true));
        assert_eq!(CALLS.load(Ordering::SeqCst) - before, 4);
    }

    #[test]
    fn test_unknown_function() {
        let b = TreeBuilder::new();
        let err = evaluate(&b.call("nope", &[]), &floating()).unwrap_err();
        assert_eq!(
            err.kind,
            EvalErrorKind::UnknownFunction {
                name: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_builtins() {
        let ctx = BasicContext::builder()
            .functions(FunctionRegistry::with_builtins())
            .build();
        let b = TreeBuilder::new();
        assert_eq!(evaluate(&b.call("false", &[]), &ctx).unwrap(), Value::Bool(false));
        let call = b.call("starts-with", &[b.text("arbor"), b.text("ar")]);
        assert_eq!(evaluate(&call, &ctx).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_apply_errors_carry_call_note() {
        let failing = BasicFunction::new("fail", Vec::new(), |_, _| Err(EvalError::new("boom")));
        let ctx = BasicContext::builder().function("fail", failing).build();
        let b = TreeBuilder::new();
        let err = evaluate(&b.call("fail", &[]), &ctx).unwrap_err();
        assert_eq!(err.message, "boom");
        assert_eq!(err.notes, vec![EvalNote::new("in call to `fail`")]);
    }

    #[test]
    fn test_lambda_node_is_a_function() {
        let b = TreeBuilder::new();
        let square = b.lambda(
            &[Parameter::required("n", ValueType::Number)],
            &b.binary(BinaryOp::Multiply, &b.reference("n"), &b.reference("n")),
        );
        let ctx = floating();
        let Value::Function(f) = evaluate(&square, &ctx).unwrap() else {
            panic!("expected a function");
        };
        assert!(f.name().is_none());
        assert_eq!(f.apply(&[Value::number(3.0)], &ctx).unwrap(), Value::number(9.0));

        // A lambda stored under a reference is callable by that name.
        let ctx = BasicContext::builder()
            .reference("square", Value::Function(f))
            .build();
        let call = b.call("square", &[b.text("4")]);
        assert_eq!(evaluate(&call, &ctx).unwrap(), Value::number(16.0));
    }
}

mod idempotence {
    use super::*;
    use pretty_assertions::assert_eq;

    fn context(kind: NumberKind) -> BasicContext {
        let double = BasicFunction::new(
            "double",
            vec![Parameter::required("n", ValueType::Number)],
            |args, _| match &args[0] {
                Value::Number(n) => Ok(Value::number(n.to_f64() * 2.0)),
                other => Err(EvalError::new(format!("not a number: {other}"))),
            },
        );
        BasicContext::builder()
            .number_kind(kind)
            .functions(FunctionRegistry::with_builtins())
            .function("double", double)
            .reference("x", Value::number(5.0))
            .build()
    }

    #[test]
    fn test_pure_tree_gives_same_value_twice() {
        let b = TreeBuilder::new();
        // double(x) * 3 - x / 7
        let arithmetic = b.binary(
            BinaryOp::Subtract,
            &b.binary(
                BinaryOp::Multiply,
                &b.call("double", &[b.reference("x")]),
                &b.number(3.0),
            ),
            &b.binary(BinaryOp::Divide, &b.reference("x"), &b.number(7.0)),
        );
        // starts-with("arbor", "ar") AND x > 2
        let logical = b.binary(
            BinaryOp::And,
            &b.call("starts-with", &[b.text("arbor"), b.text("ar")]),
            &b.binary(BinaryOp::Gt, &b.reference("x"), &b.number(2.0)),
        );

        for kind in [NumberKind::Floating, NumberKind::ArbitraryPrecision] {
            let ctx = context(kind);
            let copy = ctx.clone();
            for tree in [&arithmetic, &logical] {
                let first = evaluate(tree, &ctx).unwrap();
                assert_eq!(evaluate(tree, &ctx).unwrap(), first, "{kind}: {tree:?}");
                assert_eq!(evaluate(tree, &copy).unwrap(), first, "{kind}: {tree:?}");
            }
            assert!(ctx.is_pure(&crate::FunctionName::new("double")));
        }
    }
}

mod projections {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_boolean_and_number() {
        let b = TreeBuilder::new();
        let ctx = floating();
        assert!(b.number(2.0).to_boolean(&ctx).unwrap());
        assert!(!b.text("false").to_boolean(&ctx).unwrap());
        assert_eq!(b.text("1.5").to_number(&ctx).unwrap(), ExprNumber::Floating(1.5));
        assert!(b.text("x").to_number(&ctx).is_err());
    }

    #[test]
    fn test_to_text() {
        let b = TreeBuilder::new();
        let sum = b.binary(BinaryOp::Add, &b.number(1.0), &b.number(2.0));
        assert_eq!(&*sum.to_text(&floating()).unwrap(), "3");
    }

    #[test]
    fn test_to_reference_or_value() {
        let b = TreeBuilder::new();
        let ctx = floating();
        assert_eq!(
            b.reference("cell").to_reference_or_value(&ctx, false).unwrap(),
            Value::Reference(crate::Reference::new("cell"))
        );
        for resolve in [false, true] {
            assert_eq!(
                b.number(1.0).to_reference_or_value(&ctx, resolve).unwrap(),
                Value::number(1.0)
            );
        }
    }

    #[test]
    fn test_to_reference_or_value_forced_resolution() {
        let b = TreeBuilder::new();
        let ctx = BasicContext::builder()
            .reference("cell", Value::number(4.0))
            .build();
        assert_eq!(
            b.reference("cell").to_reference_or_value(&ctx, true).unwrap(),
            Value::number(4.0)
        );
        let err = b
            .reference("missing")
            .to_reference_or_value(&ctx, true)
            .unwrap_err();
        assert!(matches!(err.kind, EvalErrorKind::UnknownReference { .. }));
    }
}
